// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Leadflow agent.
//!
//! The inbound transport: a per-session duplex WebSocket plus a small REST
//! surface (welcome, health, contact form).

pub mod contact;
pub mod handlers;
pub mod server;
pub mod ws;

pub use contact::ContactRelay;
pub use server::{GatewayState, build_router, start_server};
