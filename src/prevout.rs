//! Previous-output resolution
//!
//! A transaction input names the output it spends but does not carry its
//! amount or locking script. Those come from a `PrevOutResolver`. Fetching
//! transactions over the network is the caller's business; `TxOutCache` holds
//! whatever transactions the caller already has.

use log::debug;
use std::collections::HashMap;

use crate::error::{Result, SigScriptError};
use crate::transaction::{Tx, TxOut};
use crate::types::{Hash, OutPoint};

/// Lookup of the output an input spends
///
/// `prev_tx` is in display byte order. Resolvers are shared across threads
/// when inputs are verified in parallel.
pub trait PrevOutResolver: Send + Sync {
    fn resolve(&self, prev_tx: &Hash, prev_index: u32, testnet: bool) -> Result<TxOut>;
}

fn not_found(prev_tx: &Hash, prev_index: u32) -> SigScriptError {
    SigScriptError::PrevOutNotFound(hex::encode(prev_tx), prev_index)
}

/// In-memory store of whole transactions keyed by id and network
#[derive(Debug, Clone, Default)]
pub struct TxOutCache {
    txs: HashMap<(Hash, bool), Tx>,
}

impl TxOutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `tx` under its own id, returning the id
    pub fn insert(&mut self, tx: Tx) -> Result<Hash> {
        let id = tx.hash()?;
        self.txs.insert((id, tx.testnet), tx);
        Ok(id)
    }

    /// Parse a raw legacy transaction and store it
    pub fn insert_raw(&mut self, raw: &[u8], testnet: bool) -> Result<Hash> {
        self.insert(Tx::parse(raw, testnet)?)
    }

    pub fn get(&self, id: &Hash, testnet: bool) -> Option<&Tx> {
        self.txs.get(&(*id, testnet))
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }
}

impl PrevOutResolver for TxOutCache {
    fn resolve(&self, prev_tx: &Hash, prev_index: u32, testnet: bool) -> Result<TxOut> {
        let output = self
            .get(prev_tx, testnet)
            .and_then(|tx| tx.tx_outs.get(prev_index as usize));
        match output {
            Some(output) => Ok(output.clone()),
            None => {
                debug!("prevout {}:{} not cached", hex::encode(prev_tx), prev_index);
                Err(not_found(prev_tx, prev_index))
            }
        }
    }
}

/// Bare outpoint map; the network flag is ignored
impl PrevOutResolver for HashMap<OutPoint, TxOut> {
    fn resolve(&self, prev_tx: &Hash, prev_index: u32, _testnet: bool) -> Result<TxOut> {
        self.get(&OutPoint {
            hash: *prev_tx,
            index: prev_index,
        })
        .cloned()
        .ok_or_else(|| not_found(prev_tx, prev_index))
    }
}
