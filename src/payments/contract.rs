//! Booking payment contract interface.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Escrow contract that receives rent and deposit for a booking.
    interface IBookingPayments {
        function createBookingPayment(
            uint256 bookingId,
            address host,
            address tenant,
            uint256 rentAmount,
            uint256 depositAmount
        ) external payable;
    }
}

/// A payment for one booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPayment {
    pub contract: Address,
    pub booking_id: u64,
    pub host: Address,
    pub tenant: Address,
    pub rent_wei: U256,
    pub deposit_wei: U256,
}

impl BookingPayment {
    /// ABI-encoded `createBookingPayment` call.
    pub fn calldata(&self) -> Bytes {
        IBookingPayments::createBookingPaymentCall {
            bookingId: U256::from(self.booking_id),
            host: self.host,
            tenant: self.tenant,
            rentAmount: self.rent_wei,
            depositAmount: self.deposit_wei,
        }
        .abi_encode()
        .into()
    }

    /// Value attached to the transaction: rent plus deposit.
    pub fn value(&self) -> U256 {
        self.rent_wei.saturating_add(self.deposit_wei)
    }
}
