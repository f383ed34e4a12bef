use std::{io::Write, path::PathBuf};

use alloy::primitives::U64;
use base::Date;
use clients::Eth;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Value};

use crate::{CombinedResult, Config, FetchOutcome, NotFound, TraceError};

pub const OUTPUT_SUFFIX: &str = "_trace.json";

/// Fetches a transaction's traces and its block timestamp, then persists the
/// combined record under `output_dir`.
///
/// The two requests are strictly ordered: the block lookup needs the block
/// number reported by the trace.
#[derive(Clone)]
pub struct TraceFetcher {
    eth: Eth,
    output_dir: PathBuf,
}

impl TraceFetcher {
    pub fn new(cfg: &Config) -> Result<Self, TraceError> {
        let eth = Eth::dial(&cfg.endpoint)?;
        Ok(Self::with_client(eth, cfg.output_dir.clone()))
    }

    pub fn with_client(eth: Eth, output_dir: PathBuf) -> Self {
        Self { eth, output_dir }
    }

    pub fn output_path(&self, hash: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", hash, OUTPUT_SUFFIX))
    }

    pub async fn fetch(&self, hash: &str) -> Result<FetchOutcome, TraceError> {
        let traces = match self.eth.trace_transaction(hash).await {
            Ok(Some(traces)) if !traces.is_empty() => traces,
            Ok(_) => {
                log::warn!("[{}] no traces returned", hash);
                return Ok(FetchOutcome::NotFound(NotFound::default()));
            }
            // an error object has no `result` either
            Err(err) if err.is_error_resp() => {
                log::warn!("[{}] node rejected trace_transaction: {}", hash, err);
                return Ok(FetchOutcome::NotFound(NotFound::default()));
            }
            Err(err) => return Err(err.into()),
        };

        let block_number = block_number_of(&traces)?;
        let block = self
            .eth
            .block_by_number(&block_number, false)
            .await?
            .ok_or_else(|| TraceError::BlockNotFound {
                number: block_number.clone(),
            })?;
        let timestamp = timestamp_of(&block, &block_number)?;

        let result = CombinedResult {
            transaction_hash: hash.to_owned(),
            block_number,
            timestamp,
            traces,
        };
        let path = self.write(&result)?;
        log::info!(
            "[{}] block {} at {} ({}), {} traces -> {}",
            hash,
            result.block_number,
            result.timestamp,
            Date::from_secs(result.timestamp),
            result.traces.len(),
            path.display()
        );
        Ok(FetchOutcome::Found(result))
    }

    /// Fetches each hash in turn, writing every outcome to `print` when given.
    ///
    /// Returns true only if every hash produced a `CombinedResult`.
    pub async fn fetch_all(&self, hashes: &[String], mut print: Option<&mut dyn Write>) -> bool {
        let mut ok = true;
        for hash in hashes {
            let outcome = match self.fetch(hash).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::error!("[{}] fetch failed: {}", hash, err);
                    ok = false;
                    continue;
                }
            };
            if let FetchOutcome::NotFound(not_found) = &outcome {
                log::warn!("[{}] {}", hash, not_found.error);
                ok = false;
            }
            if let Some(out) = print.as_mut() {
                if let Err(err) = print_outcome(&mut **out, &outcome) {
                    log::error!("[{}] print failed: {}", hash, err);
                    ok = false;
                }
            }
        }
        ok
    }

    /// Overwrites `<output_dir>/<hash>_trace.json`.
    pub fn write(&self, result: &CombinedResult) -> Result<PathBuf, TraceError> {
        let path = self.output_path(&result.transaction_hash);
        let data = render(result)?;
        std::fs::create_dir_all(&self.output_dir).map_err(TraceError::OnWriteOutput(&path))?;
        std::fs::write(&path, data).map_err(TraceError::OnWriteOutput(&path))?;
        Ok(path)
    }
}

/// Pretty JSON with a four space indent.
pub fn render<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(out)
}

fn print_outcome(out: &mut dyn Write, outcome: &FetchOutcome) -> std::io::Result<()> {
    out.write_all(&render(outcome)?)?;
    out.write_all(b"\n")
}

fn block_number_of(traces: &[Value]) -> Result<String, TraceError> {
    traces
        .first()
        .and_then(|trace| trace.get("blockNumber"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(TraceError::MissingBlockNumber)
}

fn timestamp_of(block: &Value, number: &str) -> Result<u64, TraceError> {
    let value = block
        .get("timestamp")
        .and_then(Value::as_str)
        .ok_or_else(|| TraceError::MissingTimestamp {
            number: number.to_owned(),
        })?;
    let invalid = |reason| TraceError::InvalidTimestamp {
        value: value.to_owned(),
        reason,
    };
    let digits = value.strip_prefix("0x").unwrap_or(value);
    if digits.is_empty() {
        return Err(invalid(None));
    }
    let timestamp = U64::from_str_radix(digits, 16).map_err(|err| invalid(Some(err)))?;
    Ok(timestamp.to::<u64>())
}
