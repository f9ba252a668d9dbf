//! Legacy transactions: construction, identity, signing and input validation
//!
//! A `TxIn` only names the output it spends. Amounts and locking scripts are
//! looked up through a [`PrevOutResolver`] whenever they are needed.

use log::debug;
use num_bigint::BigUint;
use std::fmt;

use crate::config::get_config;
use crate::constants::SEQUENCE_FINAL;
use crate::crypto::hash256;
use crate::error::{Result, SigScriptError};
use crate::prevout::PrevOutResolver;
use crate::s256::PrivateKey;
use crate::script::{Command, Script};
use crate::serialization::transaction::{deserialize_transaction, serialize_transaction};
use crate::transaction_hash::{calculate_transaction_sighash, sighash_to_z, SighashType};
use crate::types::{Hash, OutPoint};

// Cold error construction helpers - these paths are rarely taken
#[cold]
fn make_input_sum_overflow_error() -> SigScriptError {
    SigScriptError::Domain("Input value sum overflow".into())
}

#[cold]
fn make_output_sum_overflow_error() -> SigScriptError {
    SigScriptError::Domain("Output value sum overflow".into())
}

// ============================================================================
// TRANSACTION TYPES
// ============================================================================

/// A legacy transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    pub version: u32,
    pub tx_ins: Vec<TxIn>,
    pub tx_outs: Vec<TxOut>,
    pub locktime: u32,
    /// Network used when resolving previous outputs
    pub testnet: bool,
}

/// Reference to a previous output plus the script that unlocks it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxIn {
    /// Previous transaction id, display byte order
    pub prev_tx: Hash,
    pub prev_index: u32,
    pub script_sig: Script,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    /// Satoshis
    pub amount: u64,
    pub script_pubkey: Script,
}

impl TxIn {
    /// Unsigned input with a final sequence number
    pub fn new(prev_tx: Hash, prev_index: u32) -> Self {
        Self {
            prev_tx,
            prev_index,
            script_sig: Script::default(),
            sequence: SEQUENCE_FINAL,
        }
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint {
            hash: self.prev_tx,
            index: self.prev_index,
        }
    }

    fn prev_output(&self, resolver: &dyn PrevOutResolver, testnet: bool) -> Result<TxOut> {
        resolver.resolve(&self.prev_tx, self.prev_index, testnet)
    }

    /// Amount of the output this input spends
    pub fn value(&self, resolver: &dyn PrevOutResolver, testnet: bool) -> Result<u64> {
        Ok(self.prev_output(resolver, testnet)?.amount)
    }

    /// Locking script of the output this input spends
    pub fn script_pubkey(&self, resolver: &dyn PrevOutResolver, testnet: bool) -> Result<Script> {
        Ok(self.prev_output(resolver, testnet)?.script_pubkey)
    }

    /// Last push of the unlocking script, parsed as a redeem script
    fn redeem_script(&self) -> Result<Option<Script>> {
        match self.script_sig.commands().last() {
            Some(Command::Data(raw)) => Ok(Some(Script::from_raw(raw)?)),
            _ => Ok(None),
        }
    }
}

impl TxOut {
    pub fn new(amount: u64, script_pubkey: Script) -> Self {
        Self {
            amount,
            script_pubkey,
        }
    }
}

// ============================================================================
// IDENTITY AND SERIALIZATION
// ============================================================================

impl Tx {
    pub fn new(
        version: u32,
        tx_ins: Vec<TxIn>,
        tx_outs: Vec<TxOut>,
        locktime: u32,
        testnet: bool,
    ) -> Self {
        Self {
            version,
            tx_ins,
            tx_outs,
            locktime,
            testnet,
        }
    }

    /// Parse a complete legacy transaction; trailing bytes are an error
    pub fn parse(data: &[u8], testnet: bool) -> Result<Self> {
        let (tx, used) = deserialize_transaction(data, testnet)?;
        if used != data.len() {
            return Err(SigScriptError::Serialization(
                format!("{} trailing bytes after transaction", data.len() - used).into(),
            ));
        }
        Ok(tx)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize_transaction(self)
    }

    /// Double-SHA256 of the serialization, display byte order
    pub fn hash(&self) -> Result<Hash> {
        let mut hash = hash256(&self.serialize()?);
        hash.reverse();
        Ok(hash)
    }

    /// Hex of `hash()`
    pub fn id(&self) -> Result<String> {
        Ok(hex::encode(self.hash()?))
    }

    fn input(&self, input_index: usize) -> Result<&TxIn> {
        self.tx_ins
            .get(input_index)
            .ok_or(SigScriptError::InvalidInputIndex(input_index))
    }

    /// Sum of input values minus sum of output values
    pub fn fee(&self, resolver: &dyn PrevOutResolver) -> Result<i64> {
        let mut input_sum: u64 = 0;
        for tx_in in &self.tx_ins {
            input_sum = input_sum
                .checked_add(tx_in.value(resolver, self.testnet)?)
                .ok_or_else(make_input_sum_overflow_error)?;
        }
        let output_sum = self
            .tx_outs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.amount))
            .ok_or_else(make_output_sum_overflow_error)?;

        let fee = i128::from(input_sum) - i128::from(output_sum);
        i64::try_from(fee).map_err(|_| SigScriptError::Domain("Fee out of range".into()))
    }
}

// ============================================================================
// SIGNATURE HASH
// ============================================================================

impl Tx {
    /// Legacy SIGHASH_ALL scalar for input `input_index`, signing over the
    /// previous output's locking script
    pub fn sig_hash(&self, input_index: usize, resolver: &dyn PrevOutResolver) -> Result<BigUint> {
        let script_pubkey = self.input(input_index)?.script_pubkey(resolver, self.testnet)?;
        self.sig_hash_with_script(input_index, &script_pubkey)
    }

    /// As `sig_hash`, signing over a P2SH redeem script instead
    pub fn sig_hash_with_redeem(&self, input_index: usize, redeem: &Script) -> Result<BigUint> {
        self.sig_hash_with_script(input_index, redeem)
    }

    fn sig_hash_with_script(&self, input_index: usize, script_code: &Script) -> Result<BigUint> {
        let digest =
            calculate_transaction_sighash(self, input_index, script_code, SighashType::All)?;
        Ok(sighash_to_z(&digest))
    }
}

// ============================================================================
// SIGNING AND VALIDATION
// ============================================================================

impl Tx {
    /// Run unlocking ++ locking script for input `input_index`
    ///
    /// For P2SH outputs `z` is computed over the redeem script carried as the
    /// last push of the unlocking script. Returns `Ok(false)` for any script
    /// failure; `Err` for lookups, bad indices and unparseable scripts.
    pub fn verify_input(&self, input_index: usize, resolver: &dyn PrevOutResolver) -> Result<bool> {
        let tx_in = self.input(input_index)?;
        let script_pubkey = tx_in.script_pubkey(resolver, self.testnet)?;

        let z = if script_pubkey.is_p2sh_script_pubkey() {
            match tx_in.redeem_script()? {
                Some(redeem) => self.sig_hash_with_redeem(input_index, &redeem)?,
                None => {
                    debug!("input {} spends p2sh without a redeem script", input_index);
                    return Ok(false);
                }
            }
        } else {
            self.sig_hash_with_script(input_index, &script_pubkey)?
        };

        tx_in.script_sig.concat(&script_pubkey).evaluate(&z)
    }

    /// Sign input `input_index` as P2PKH and check the result
    ///
    /// The unlocking script becomes `[der || SIGHASH_ALL, sec]`, with the SEC
    /// form chosen by `keys.compressed_sec`.
    pub fn sign_input(
        &mut self,
        input_index: usize,
        key: &PrivateKey,
        resolver: &dyn PrevOutResolver,
    ) -> Result<bool> {
        let z = self.sig_hash(input_index, resolver)?;
        let mut sig = key.sign(&z)?.der();
        sig.push(SighashType::All.as_byte());
        let sec = key.point().sec(get_config().keys.compressed_sec)?;

        let script_sig = Script::new(vec![Command::Data(sig), Command::Data(sec)]);
        if let Some(tx_in) = self.tx_ins.get_mut(input_index) {
            tx_in.script_sig = script_sig;
        }
        self.verify_input(input_index, resolver)
    }

    /// Non-negative fee and every input valid
    pub fn verify(&self, resolver: &dyn PrevOutResolver) -> Result<bool> {
        if self.fee(resolver)? < 0 {
            debug!("tx spends more than its inputs");
            return Ok(false);
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let verdicts = (0..self.tx_ins.len())
                .into_par_iter()
                .map(|i| self.verify_input(i, resolver))
                .collect::<Result<Vec<bool>>>()?;
            Ok(verdicts.into_iter().all(|ok| ok))
        }

        #[cfg(not(feature = "parallel"))]
        {
            for i in 0..self.tx_ins.len() {
                if !self.verify_input(i, resolver)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for TxIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outpoint())
    }
}

impl fmt::Display for TxOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.amount, self.script_pubkey)
    }
}

impl fmt::Display for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Ok(id) => writeln!(f, "tx: {id}")?,
            Err(_) => writeln!(f, "tx: <unserializable>")?,
        }
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "tx_ins:")?;
        for tx_in in &self.tx_ins {
            writeln!(f, "{tx_in}")?;
        }
        writeln!(f, "tx_outs:")?;
        for tx_out in &self.tx_outs {
            writeln!(f, "{tx_out}")?;
        }
        write!(f, "locktime: {}", self.locktime)
    }
}
