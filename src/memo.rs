//! Result caching for compiled lambdas.

use crate::expression::{CompiledLambda, ExpressionResult};
use crate::value::Value;
use log::trace;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A compiled lambda that remembers results per argument tuple
///
/// The cache belongs to this wrapper only. Failed calls are not cached.
pub struct MemoizedLambda {
    compiled: CompiledLambda,
    cache: Mutex<HashMap<Vec<Value>, Value>>,
    hits: AtomicUsize,
}

impl MemoizedLambda {
    pub fn new(compiled: CompiledLambda) -> Self {
        Self {
            compiled,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
        }
    }

    /// Return the cached result for `arguments`, computing it on first use
    pub fn call(&self, arguments: &[Value]) -> ExpressionResult<Value> {
        if let Some(value) = self.cache.lock().get(arguments) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("Cache hit for {:?}", arguments);
            return Ok(value.clone());
        }

        // Evaluate outside the lock
        let value = self.compiled.call(arguments)?;
        trace!("Cache miss for {:?}, computed {}", arguments, value);
        self.cache.lock().insert(arguments.to_vec(), value.clone());
        Ok(value)
    }

    pub fn compiled(&self) -> &CompiledLambda {
        &self.compiled
    }

    /// Number of cached argument tuples
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Calls answered from the cache so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
    }
}
