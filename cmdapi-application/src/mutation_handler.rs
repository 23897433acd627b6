use crate::{context::AppContext, error::AppError, mutation::Mutation};
use async_trait::async_trait;

#[async_trait]
pub trait MutationHandler<M>: Send + Sync
where
    M: Mutation,
{
    async fn handle(&self, ctx: &AppContext, m: M) -> Result<M::Output, AppError>;
}
