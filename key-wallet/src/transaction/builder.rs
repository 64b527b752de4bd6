//! Transaction staging
//!
//! A [`StagingTransaction`] collects inputs and outputs until it is
//! finalized into a [`Tx`]. Once finalized it refuses every further change.

use tracing::{debug, trace};

use super::fee::LinearFee;
use super::{Coin, Error, Tx, TxIn, TxOut, TxoPointer};
use crate::address::Address;

/// Lifecycle of a staging transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagingState {
    /// Nothing added yet
    Empty,
    /// At least one input or output added
    Building,
    /// Finalized, no further changes accepted
    Finalized,
}

/// Mutable transaction under construction
#[derive(Debug, Clone)]
pub struct StagingTransaction {
    /// Outputs being spent, with their values
    inputs: Vec<TxIn>,
    /// Outputs to create
    outputs: Vec<TxOut>,
    /// Where the surplus goes, if anywhere
    change_address: Option<Address>,
    /// Fee algorithm
    fee: LinearFee,
    state: StagingState,
}

impl Default for StagingTransaction {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingTransaction {
    /// Create an empty staging transaction using the Byron mainnet fee
    pub fn new() -> Self {
        Self::with_fee(LinearFee::default())
    }

    /// Create an empty staging transaction with a fee algorithm
    pub fn with_fee(fee: LinearFee) -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            change_address: None,
            fee,
            state: StagingState::Empty,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> StagingState {
        self.state
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.state == StagingState::Finalized {
            return Err(Error::AlreadyFinalized);
        }
        Ok(())
    }

    /// Spend the output at `pointer`, holding `value`
    pub fn add_input(&mut self, pointer: TxoPointer, value: Coin) -> Result<(), Error> {
        self.ensure_open()?;
        if self.inputs.iter().any(|input| input.pointer == pointer) {
            return Err(Error::DuplicateInput(pointer));
        }
        trace!("staging input {} ({} lovelace)", pointer, value);
        self.inputs.push(TxIn {
            pointer,
            value,
        });
        self.state = StagingState::Building;
        Ok(())
    }

    /// Send `value` to `address`
    pub fn add_output(&mut self, address: Address, value: Coin) -> Result<(), Error> {
        self.ensure_open()?;
        trace!("staging output {} ({} lovelace)", address, value);
        self.outputs.push(TxOut::new(address, value));
        self.state = StagingState::Building;
        Ok(())
    }

    /// Send the surplus above outputs and fee to `address` on finalization
    pub fn set_change_address(&mut self, address: Address) -> Result<(), Error> {
        self.ensure_open()?;
        self.change_address = Some(address);
        Ok(())
    }

    /// Replace the fee algorithm
    pub fn set_fee_algorithm(&mut self, fee: LinearFee) -> Result<(), Error> {
        self.ensure_open()?;
        self.fee = fee;
        Ok(())
    }

    /// Staged inputs
    pub fn inputs(&self) -> &[TxIn] {
        &self.inputs
    }

    /// Staged outputs
    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// Sum of the staged inputs
    pub fn total_input(&self) -> Result<Coin, Error> {
        Coin::sum(self.inputs.iter().map(|input| input.value))
    }

    /// Sum of the staged outputs
    pub fn total_output(&self) -> Result<Coin, Error> {
        Coin::sum(self.outputs.iter().map(|output| output.value))
    }

    fn unsigned_tx(&self, outputs: Vec<TxOut>) -> Tx {
        Tx::new(self.inputs.iter().map(|input| input.pointer).collect(), outputs)
    }

    /// Fee for the transaction as currently staged, without a change output
    pub fn estimate_fee(&self) -> Result<Coin, Error> {
        let tx = self.unsigned_tx(self.outputs.clone());
        self.fee.estimate(tx.size_with_witnesses())
    }

    /// Check the balance and produce the transaction.
    ///
    /// When a change address is set and the surplus pays for the larger
    /// transaction, a change output is appended. Otherwise the surplus is
    /// left to the fee.
    pub fn finalize(&mut self) -> Result<Tx, Error> {
        self.ensure_open()?;
        if self.inputs.is_empty() {
            return Err(Error::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(Error::NoOutputs);
        }

        let total_input = self.total_input()?;
        let total_output = self.total_output()?;
        let fee = self.estimate_fee()?;
        let required = total_output.checked_add(fee)?;
        let surplus = total_input.checked_sub(required).ok_or(Error::InsufficientFunds {
            available: total_input.as_u64(),
            required: required.as_u64(),
        })?;

        let mut outputs = self.outputs.clone();
        if let Some(change_address) = &self.change_address {
            // Size with the change output only shrinks as its value drops,
            // so the fee computed with the whole surplus is an upper bound.
            let mut candidate = outputs.clone();
            candidate.push(TxOut::new(change_address.clone(), surplus));
            let fee_with_change = self.fee.estimate(self.unsigned_tx(candidate).size_with_witnesses())?;
            match total_input.checked_sub(total_output.checked_add(fee_with_change)?) {
                Some(change) if change > Coin::zero() => {
                    outputs.push(TxOut::new(change_address.clone(), change));
                }
                _ => trace!("surplus of {} lovelace does not cover a change output", surplus),
            }
        }

        let tx = self.unsigned_tx(outputs);
        self.state = StagingState::Finalized;
        debug!(
            "finalized transaction {} with {} inputs and {} outputs",
            tx.id(),
            tx.inputs().len(),
            tx.outputs().len()
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip32::XPrv;
    use crate::transaction::TxId;

    fn address(seed: u8) -> Address {
        let xpub = XPrv::from_normalized_seed(&[seed; 96]).public();
        Address::new_simple(&xpub)
    }

    fn pointer(index: u32) -> TxoPointer {
        TxoPointer::new(TxId::from_bytes([0x11; 32]), index)
    }

    fn coin(value: u64) -> Coin {
        Coin::new(value).unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let mut staging = StagingTransaction::new();
        assert_eq!(staging.state(), StagingState::Empty);
        staging.add_input(pointer(0), coin(2_000_000)).unwrap();
        assert_eq!(staging.state(), StagingState::Building);
        staging.add_output(address(1), coin(1_000_000)).unwrap();
        staging.finalize().unwrap();
        assert_eq!(staging.state(), StagingState::Finalized);
    }

    #[test]
    fn test_duplicate_input_rejected() {
        let mut staging = StagingTransaction::new();
        staging.add_input(pointer(0), coin(1)).unwrap();
        assert_eq!(staging.add_input(pointer(0), coin(1)), Err(Error::DuplicateInput(pointer(0))));
        assert!(staging.add_input(pointer(1), coin(1)).is_ok());
    }

    #[test]
    fn test_finalize_requires_inputs_and_outputs() {
        let mut staging = StagingTransaction::new();
        assert_eq!(staging.finalize(), Err(Error::NoInputs));
        staging.add_input(pointer(0), coin(1)).unwrap();
        assert_eq!(staging.finalize(), Err(Error::NoOutputs));
        assert_eq!(staging.state(), StagingState::Building);
    }

    #[test]
    fn test_insufficient_funds() {
        let mut staging = StagingTransaction::new();
        staging.add_input(pointer(0), coin(1_000_000)).unwrap();
        staging.add_output(address(1), coin(1_000_000)).unwrap();
        let fee = staging.estimate_fee().unwrap();
        assert_eq!(
            staging.finalize(),
            Err(Error::InsufficientFunds {
                available: 1_000_000,
                required: 1_000_000 + fee.as_u64(),
            })
        );
        // a failed finalize leaves the transaction open
        assert!(staging.add_input(pointer(1), coin(1_000_000)).is_ok());
        assert!(staging.finalize().is_ok());
    }

    #[test]
    fn test_zero_fee_balances_exactly() {
        let mut staging = StagingTransaction::with_fee(LinearFee::new(0, 0));
        staging.add_input(pointer(0), coin(5)).unwrap();
        staging.add_output(address(1), coin(5)).unwrap();
        staging.set_change_address(address(2)).unwrap();
        let tx = staging.finalize().unwrap();
        assert_eq!(tx.outputs().len(), 1);
    }

    #[test]
    fn test_change_output_added() {
        let mut staging = StagingTransaction::new();
        staging.add_input(pointer(0), coin(10_000_000)).unwrap();
        staging.add_output(address(1), coin(1_000_000)).unwrap();
        staging.set_change_address(address(2)).unwrap();
        let tx = staging.finalize().unwrap();

        assert_eq!(tx.outputs().len(), 2);
        let change = &tx.outputs()[1];
        assert_eq!(change.address, address(2));
        let fee = LinearFee::default().estimate(tx.size_with_witnesses()).unwrap();
        assert!(1_000_000 + change.value.as_u64() + fee.as_u64() <= 10_000_000);
    }

    #[test]
    fn test_mutation_after_finalize() {
        let mut staging = StagingTransaction::new();
        staging.add_input(pointer(0), coin(2_000_000)).unwrap();
        staging.add_output(address(1), coin(1_000_000)).unwrap();
        staging.finalize().unwrap();

        assert_eq!(staging.add_input(pointer(1), coin(1)), Err(Error::AlreadyFinalized));
        assert_eq!(staging.add_output(address(1), coin(1)), Err(Error::AlreadyFinalized));
        assert_eq!(staging.set_change_address(address(1)), Err(Error::AlreadyFinalized));
        assert_eq!(staging.set_fee_algorithm(LinearFee::default()), Err(Error::AlreadyFinalized));
        assert_eq!(staging.finalize(), Err(Error::AlreadyFinalized));
    }
}
