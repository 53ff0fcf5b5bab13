// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for the host services the app relies on
//!
//! # Architecture
//!
//! Each service is a narrow trait with a portable implementation, so the
//! app runs the same way in the terminal, from the CLI and under test:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐    ┌──────────────────┐    │
//! │  │   Camera    │    │  Photo library   │    │
//! │  │  (session)  │    │    (folder)      │    │
//! │  └─────────────┘    └──────────────────┘    │
//! │  ┌─────────────┐    ┌──────────────────┐    │
//! │  │   Picker    │    │   Permissions    │    │
//! │  │(dialog/path)│    │  (configured)    │    │
//! │  └─────────────┘    └──────────────────┘    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Capture devices, session handle and virtual devices
//! - [`library`]: Saving captured photos
//! - [`picker`]: Choosing a reference image
//! - [`permission`]: Camera authorization

pub mod camera;
pub mod library;
pub mod permission;
pub mod picker;
