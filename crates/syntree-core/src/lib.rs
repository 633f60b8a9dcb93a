//! Syntree Core Types and Definitions
//!
//! This crate provides the foundational types shared by the syntree parser,
//! layout engine and renderer. It includes:
//!
//! - **Elements**: The arena of tree nodes and leaves ([`element::ElementStore`])
//! - **Labels**: Marker stripping and word counting for element content ([`label::Label`])
//! - **Text**: The [`text::TextMetrics`] seam and its measurers
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod element;
pub mod geometry;
pub mod label;
pub mod text;
