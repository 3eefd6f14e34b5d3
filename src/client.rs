//! Typed queries over the configuration tree.
//!
//! Predicates collapse every failure of the external tool to `false`: a
//! missing path and a path lacking the queried property look the same.
//! Value accessors shape-check the node first so callers get a specific
//! error for "wrong node kind" distinct from "path doesn't exist".

use std::fmt;

use crate::config::ClientConfig;
use crate::error::{ExternalQueryFailed, QueryError};
use crate::invoke::{Invoke, ShellApi};
use crate::op::Operation;
use crate::parse::{path_tokens, split_quoted};

/// Blocking client for `cli-shell-api`.
///
/// Holds no state between calls; every method is one (or a few) subprocess
/// runs. Safe to share across threads, though calls are not coordinated.
pub struct ConfigQueryClient {
    invoker: Box<dyn Invoke>,
}

impl fmt::Debug for ConfigQueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigQueryClient").finish_non_exhaustive()
    }
}

impl Default for ConfigQueryClient {
    fn default() -> Self {
        Self::with_invoker(ShellApi::new(&ClientConfig::default()))
    }
}

impl ConfigQueryClient {
    /// Build a client from a validated config.
    pub fn new(config: ClientConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::with_invoker(ShellApi::new(&config)))
    }

    pub(crate) fn with_invoker(invoker: impl Invoke + 'static) -> Self {
        Self {
            invoker: Box::new(invoker),
        }
    }

    fn run(&self, op: Operation, path: &str) -> Result<Vec<u8>, ExternalQueryFailed> {
        self.invoker.invoke(op, &path_tokens(path))
    }

    fn check(&self, op: Operation, path: &str) -> bool {
        self.run(op, path).is_ok()
    }

    /// Whether `path` exists in the working config.
    pub fn exists(&self, path: &str) -> bool {
        self.check(Operation::Exists, path)
    }

    /// Whether `path` exists in the active (committed) config.
    pub fn exists_active(&self, path: &str) -> bool {
        self.check(Operation::ExistsActive, path)
    }

    pub fn session_changed(&self) -> bool {
        self.check(Operation::SessionChanged, "")
    }

    pub fn session_unsaved(&self) -> bool {
        self.check(Operation::SessionUnsaved, "")
    }

    pub fn in_session(&self) -> bool {
        self.check(Operation::InSession, "")
    }

    pub fn is_multi(&self, path: &str) -> bool {
        self.check(Operation::IsMulti, path)
    }

    pub fn is_tag(&self, path: &str) -> bool {
        self.check(Operation::IsTag, path)
    }

    pub fn is_leaf(&self, path: &str) -> bool {
        self.check(Operation::IsLeaf, path)
    }

    /// Raw value of a single-value leaf in the working config.
    ///
    /// Output is returned verbatim, without trimming.
    ///
    /// # Errors
    /// `MultiNode` or `NonLeafNode` if the node has the wrong shape (the value
    /// query is never run), `PathNotFound` if the tool then reports failure.
    pub fn return_value(&self, path: &str) -> crate::Result<Vec<u8>> {
        self.single_value(Operation::ReturnValue, "return_value", path)
    }

    /// Like [`return_value`](Self::return_value) against the active config.
    pub fn return_active_value(&self, path: &str) -> crate::Result<Vec<u8>> {
        self.single_value(Operation::ReturnActiveValue, "return_active_value", path)
    }

    /// Raw values of a multi-value leaf, still in the tool's quoted form.
    /// Use [`split_quoted`] to break them apart.
    ///
    /// # Errors
    /// `NonMultiNode` or `NonLeafNode` on wrong shape, `PathNotFound` if the
    /// tool reports failure.
    pub fn return_values(&self, path: &str) -> crate::Result<Vec<u8>> {
        self.multi_value(Operation::ReturnValues, "return_values", path)
    }

    /// Like [`return_values`](Self::return_values) against the active config.
    pub fn return_active_values(&self, path: &str) -> crate::Result<Vec<u8>> {
        self.multi_value(Operation::ReturnActiveValues, "return_active_values", path)
    }

    /// Names of the children of a tag node, in the order the tool emits them.
    ///
    /// Names are returned exactly as stored so they can be fed back into
    /// other queries; output is never decoded lossily.
    ///
    /// # Errors
    /// `NonTagNode` without running the listing, `PathNotFound` if the tool
    /// reports failure, `NonUtf8Output` if the listing is not valid UTF-8.
    pub fn list_nodes(&self, path: &str) -> crate::Result<Vec<String>> {
        self.child_nodes(Operation::ListNodes, "list_nodes", path)
    }

    /// Like [`list_nodes`](Self::list_nodes) against the active config.
    pub fn list_active_nodes(&self, path: &str) -> crate::Result<Vec<String>> {
        self.child_nodes(Operation::ListActiveNodes, "list_active_nodes", path)
    }

    fn single_value(
        &self,
        op: Operation,
        name: &'static str,
        path: &str,
    ) -> crate::Result<Vec<u8>> {
        if self.is_multi(path) {
            tracing::debug!(op = name, path, "rejected: multi node");
            return Err(QueryError::MultiNode {
                op: name,
                path: path.to_string(),
            });
        }
        if !self.is_leaf(path) {
            tracing::debug!(op = name, path, "rejected: non-leaf node");
            return Err(QueryError::NonLeafNode {
                op: name,
                path: path.to_string(),
            });
        }
        self.fetch(op, path)
    }

    fn multi_value(
        &self,
        op: Operation,
        name: &'static str,
        path: &str,
    ) -> crate::Result<Vec<u8>> {
        if !self.is_multi(path) {
            tracing::debug!(op = name, path, "rejected: non-multi node");
            return Err(QueryError::NonMultiNode {
                op: name,
                path: path.to_string(),
            });
        }
        if !self.is_leaf(path) {
            tracing::debug!(op = name, path, "rejected: non-leaf node");
            return Err(QueryError::NonLeafNode {
                op: name,
                path: path.to_string(),
            });
        }
        self.fetch(op, path)
    }

    fn child_nodes(
        &self,
        op: Operation,
        name: &'static str,
        path: &str,
    ) -> crate::Result<Vec<String>> {
        if !self.is_tag(path) {
            tracing::debug!(op = name, path, "rejected: non-tag node");
            return Err(QueryError::NonTagNode {
                op: name,
                path: path.to_string(),
            });
        }
        let out = self.fetch(op, path)?;
        let out = String::from_utf8(out).map_err(|_| QueryError::NonUtf8Output {
            op: name,
            path: path.to_string(),
        })?;
        Ok(split_quoted(&out))
    }

    fn fetch(&self, op: Operation, path: &str) -> crate::Result<Vec<u8>> {
        self.run(op, path)
            .map_err(|ExternalQueryFailed| QueryError::PathNotFound(path.to_string()))
    }
}
