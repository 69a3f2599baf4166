//! Field resolvers.
//!
//! Every field carries exactly one [`Resolver`] behind an `Arc`. A resolver gets
//! the parent value and the already-coerced arguments and returns a JSON value:
//! a scalar to be coerced to the field's declared type, an object to resolve
//! sub-selections against, or `null`.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::GqlResult;

/// Coerced argument values, keyed by argument name.
pub type Arguments = Map<String, Value>;

#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, parent: &Value, args: &Arguments) -> GqlResult<Value>;
}

/// Adapts a synchronous closure into a [`Resolver`].
pub struct FnResolver<F> {
    func: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&Value, &Arguments) -> GqlResult<Value> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> Resolver for FnResolver<F>
where
    F: Fn(&Value, &Arguments) -> GqlResult<Value> + Send + Sync,
{
    async fn resolve(&self, parent: &Value, args: &Arguments) -> GqlResult<Value> {
        (self.func)(parent, args)
    }
}

/// Adapts a closure returning a future. The closure receives owned copies of
/// the parent and arguments so the future can outlive the call.
pub struct AsyncFnResolver<F, Fut> {
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> AsyncFnResolver<F, Fut>
where
    F: Fn(Value, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = GqlResult<Value>> + Send,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _future: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> Resolver for AsyncFnResolver<F, Fut>
where
    F: Fn(Value, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = GqlResult<Value>> + Send,
{
    async fn resolve(&self, parent: &Value, args: &Arguments) -> GqlResult<Value> {
        (self.func)(parent.clone(), args.clone()).await
    }
}

/// Default resolver: reads the same-named key off the parent object.
/// Anything that is not an object, or lacks the key, resolves to `null`.
pub struct PropertyResolver {
    key: String,
}

impl PropertyResolver {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[async_trait]
impl Resolver for PropertyResolver {
    async fn resolve(&self, parent: &Value, _args: &Arguments) -> GqlResult<Value> {
        Ok(parent.get(&self.key).cloned().unwrap_or(Value::Null))
    }
}
