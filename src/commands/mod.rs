// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod transactions;
pub mod jars;
pub mod settings;
pub mod reports;
pub mod words;
pub mod importer;
pub mod exporter;
pub mod doctor;
