// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Turns a packaged LÖVE game into a browser build with love.js, then dresses up the
//! generated page with a loading screen and meta tags.
pub mod compile;
pub mod config;
pub mod error;
pub mod patch;
pub mod pipeline;
pub mod toolchain;
