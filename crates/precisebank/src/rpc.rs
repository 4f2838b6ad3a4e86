use crate::{
    keeper::Keeper,
    query::{
        FractionalBalanceResponse, QueryError, RemainderResponse, TotalFractionalBalancesResponse,
    },
    store::KvStore,
};
use async_trait::async_trait;
use jsonrpsee::tracing::debug;
use jsonrpsee_core::RpcResult;
use jsonrpsee_proc_macros::rpc;
use jsonrpsee_types::{error::INVALID_PARAMS_CODE, ErrorObjectOwned};
use parking_lot::RwLock;
use std::sync::Arc;

/// Precise bank RPC API trait
#[rpc(server, namespace = "precisebank")]
pub trait PreciseBankApi {
    /// Current remainder held by the reserve, in the extended denomination
    #[method(name = "remainder")]
    async fn remainder(&self) -> RpcResult<RemainderResponse>;

    /// Fractional balance of an account, in the extended denomination
    #[method(name = "fractionalBalance")]
    async fn fractional_balance(&self, address: String) -> RpcResult<FractionalBalanceResponse>;

    /// Sum of all fractional balances, in the extended denomination
    #[method(name = "totalFractionalBalances")]
    async fn total_fractional_balances(&self) -> RpcResult<TotalFractionalBalancesResponse>;
}

/// Implementation of the precise bank RPC API
#[derive(Debug)]
pub struct PreciseBankApiImpl<S, L> {
    /// Shared keeper
    keeper: Arc<RwLock<Keeper<S, L>>>,
}

impl<S, L> PreciseBankApiImpl<S, L> {
    /// Creates a new instance of `PreciseBankApi`.
    pub const fn new(keeper: Arc<RwLock<Keeper<S, L>>>) -> Self {
        Self { keeper }
    }
}

/// Creates a new precise bank RPC module
pub const fn create_precisebank_module<S, L>(
    keeper: Arc<RwLock<Keeper<S, L>>>,
) -> PreciseBankApiImpl<S, L>
where
    S: KvStore + Send + Sync + 'static,
    L: Send + Sync + 'static,
{
    PreciseBankApiImpl { keeper }
}

fn invalid_params(err: QueryError) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(INVALID_PARAMS_CODE, err.to_string(), None::<()>)
}

#[async_trait]
impl<S, L> PreciseBankApiServer for PreciseBankApiImpl<S, L>
where
    S: KvStore + Send + Sync + 'static,
    L: Send + Sync + 'static,
{
    async fn remainder(&self) -> RpcResult<RemainderResponse> {
        let response = self.keeper.read().query_remainder();
        debug!("remainder returning {}", response.remainder);
        Ok(response)
    }

    async fn fractional_balance(&self, address: String) -> RpcResult<FractionalBalanceResponse> {
        let response = self
            .keeper
            .read()
            .query_fractional_balance(&address)
            .map_err(invalid_params)?;
        debug!(
            "fractionalBalance of {} returning {}",
            address, response.fractional_balance
        );
        Ok(response)
    }

    async fn total_fractional_balances(&self) -> RpcResult<TotalFractionalBalancesResponse> {
        let response = self.keeper.read().query_total_fractional_balances();
        debug!("totalFractionalBalances returning {}", response.total);
        Ok(response)
    }
}
