// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for photo capture
//!
//! Heavy work runs off the caller's thread so the live preview keeps
//! refreshing while a photo is encoded and written.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌───────────────┐
//! │ Capture      │ ──▶ │  Photo Pipeline   │ ──▶ │ Photo library │
//! │ session      │     │  - still capture  │     │ (new asset)   │
//! │              │     │  - authorization  │     │               │
//! └──────────────┘     └───────────────────┘     └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Still capture, JPEG/PNG encoding and library save

pub mod photo;
