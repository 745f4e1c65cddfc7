// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

//! Region, boundary and temporal stability evaluation of video object
//! segmentation masks.

pub mod config;
pub mod constant;
pub mod cv;
pub mod error;
pub mod ev;
pub mod im;
pub mod io;
pub mod ms;
pub mod ut;
