//! Booking payment on chain.
//!
//! # Data Flow
//! ```text
//! booking total price (fiat)
//!     → conversion.rs (fixed rate → ether → wei)
//!     → contract.rs (createBookingPayment calldata)
//!     → gateway.rs (build, sign, submit, receipt)
//! ```

pub mod contract;
pub mod conversion;
pub mod gateway;

pub use contract::BookingPayment;
pub use conversion::{ether_to_wei, to_chain_amount, try_to_chain_amount, ConversionError};
pub use gateway::{ChainGateway, PaymentGateway, PaymentReceipt};
