//! Domain layer for the franchise supply ordering core.
//!
//! This crate provides:
//! - Aggregate and DomainEvent traits for event-sourced entities
//! - CommandHandler for optimistic-concurrency command processing
//! - The pure 80/20 compliance evaluator
//! - The Order aggregate with its state machine and builder validation

pub mod aggregate;
pub mod command;
pub mod compliance;
pub mod error;
pub mod order;

pub use aggregate::{Aggregate, DomainEvent};
pub use command::{Command, CommandHandler, CommandResult};
pub use compliance::{ComplianceReport, REQUIRED_COMPANY_PCT, evaluate};
pub use error::DomainError;
pub use order::{
    CancelOrder, CandidateLine, DeliverOrder, FranchiseId, Order, OrderError, OrderEvent,
    OrderLine, OrderService, OrderStatus, PlaceOrder, PrepareOrder, ReplaceLines, ValidateOrder,
    build_lines,
};
