use crate::{
    context::AppContext, error::AppError, mutation::Mutation, mutation_bus::MutationBus,
    mutation_handler::MutationHandler,
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxAnySend = Box<dyn Any + Send>;

type MutHandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<BoxAnySend, AppError>> + Send + 'a>>;

type MutHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> MutHandlerFuture<'a> + Send + Sync>;

/// 基于内存的 MutationBus 实现
/// - 通过 TypeId 注册不同 Mutation 对应的 Handler
/// - 运行时以类型擦除（Any）方式进行调度
pub struct InMemoryMutationBus {
    handlers: DashMap<TypeId, MutHandlerFn>,
}

impl Default for InMemoryMutationBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryMutationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册变更处理器
    pub fn register<M, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        M: Mutation,
        H: MutationHandler<M> + 'static,
    {
        let f: MutHandlerFn = Arc::new(move |boxed_m, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 正常情况下这里的 downcast 永远不会失败（键与闭包同一泛型 M）
                match boxed_m.downcast::<M>() {
                    Ok(m) => {
                        let out = handler.handle(ctx, *m).await?;
                        Ok(Box::new(out) as BoxAnySend)
                    }
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: M::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        match self.handlers.entry(TypeId::of::<M>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegisteredMutation { mutation: M::NAME }),
            Entry::Vacant(slot) => {
                slot.insert(f);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl MutationBus for InMemoryMutationBus {
    async fn dispatch<M>(&self, ctx: &AppContext, m: M) -> Result<M::Output, AppError>
    where
        M: Mutation,
    {
        let Some(f) = self
            .handlers
            .get(&TypeId::of::<M>())
            .map(|entry| entry.value().clone())
        else {
            return Err(AppError::HandlerNotFound(M::NAME));
        };

        let out = (f)(Box::new(m), ctx).await?;

        out.downcast::<M::Output>()
            .map(|boxed| *boxed)
            .map_err(|_| AppError::TypeMismatch {
                expected: type_name::<M::Output>(),
                found: "unknown",
            })
    }
}
