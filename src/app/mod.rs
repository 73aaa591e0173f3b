//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the orchestration rules for the irrigation
//! controller: the control cycle, command handling, and the fail-safe
//! override.  All interaction with hardware and the network happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
