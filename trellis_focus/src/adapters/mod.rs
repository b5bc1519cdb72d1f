// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters connecting the navigator to concrete menu sources.

pub mod menu_graph;
