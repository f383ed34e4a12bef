use std::{borrow::Cow, sync::Arc};

use alloy::{
    providers::{Provider, ProviderBuilder},
    rpc::{
        client::RpcClientInner,
        json_rpc::{RpcParam, RpcReturn},
    },
    transports::{
        http::{Client, Http},
        RpcError, TransportErrorKind,
    },
};
use serde_json::Value;

base::stack_error! {
    #[derive(Debug)]
    name: EthError,
    stack_name: EthErrorStack,
    error: {},
    wrap: {
        Url(url::ParseError),
        Rpc(RpcError<TransportErrorKind>),
    },
    stack: {
        OnTraceTransaction(hash: String),
        OnGetBlock(number: String),
    }
}

impl EthError {
    /// The node answered with a JSON-RPC error object, as opposed to the
    /// request never completing.
    pub fn is_error_resp(&self) -> bool {
        matches!(self.origin(), Self::Rpc(RpcError::ErrorResp(_)))
    }
}

#[derive(Clone)]
pub struct Eth {
    endpoint: String,
    client: Arc<Box<dyn Provider<Http<Client>>>>,
}

impl Eth {
    pub fn dial(endpoint: &str) -> Result<Eth, EthError> {
        let url = endpoint.try_into()?;
        let provider: Box<dyn Provider<Http<Client>>> =
            Box::new(ProviderBuilder::new().on_http(url));

        Ok(Eth {
            endpoint: endpoint.to_owned(),
            client: Arc::new(provider),
        })
    }

    pub fn client(&self) -> &RpcClientInner<Http<Client>> {
        self.client.client()
    }

    /// `trace_transaction`; a `null` result from the node becomes `None`.
    ///
    /// The hash is forwarded as given, the node is the one validating it.
    pub async fn trace_transaction(&self, hash: &str) -> Result<Option<Vec<Value>>, EthError> {
        let hash = hash.to_owned();
        log::debug!("[{}] trace_transaction {}", self.endpoint, hash);
        let traces = self
            .request("trace_transaction", (hash.clone(),))
            .await
            .map_err(EthError::OnTraceTransaction(&hash))?;
        Ok(traces)
    }

    /// `eth_getBlockByNumber` with the block number in the node's own hex form.
    pub async fn block_by_number(
        &self,
        number: &str,
        full_txs: bool,
    ) -> Result<Option<Value>, EthError> {
        let number = number.to_owned();
        log::debug!(
            "[{}] eth_getBlockByNumber {} full={}",
            self.endpoint,
            number,
            full_txs
        );
        let block = self
            .request("eth_getBlockByNumber", (number.clone(), full_txs))
            .await
            .map_err(EthError::OnGetBlock(&number))?;
        Ok(block)
    }

    pub async fn request<Params: RpcParam, Resp: RpcReturn>(
        &self,
        method: impl Into<Cow<'static, str>>,
        params: Params,
    ) -> Result<Resp, EthError> {
        let resp = self.client().request(method, params).await?;
        Ok(resp)
    }
}
