use anyhow::Result;
use reqwest::StatusCode;
use serde::Serialize;
use url::Url;

use crate::tracing::*;

pub type NodeId = u64;

const ADD_NODE: &str = "add_node";
const CHECKPOINT: &str = "checkpoint";

/// Anything the fill loop can push node ids into.
pub trait NodeSink {
    fn add_node(&mut self, id: NodeId) -> Result<StatusCode, reqwest::Error>;

    /// Where the nodes end up, for progress output.
    fn target(&self) -> &Url;
}

#[derive(Debug, Serialize)]
struct AddNode {
    node_id: NodeId,
}

/// Blocking client for the graph server's HTTP controller.
pub struct Client {
    inner: reqwest::blocking::Client,
    base: Url,
    add_node: Url,
}

impl Client {
    pub fn new(base: &Url) -> Result<Client> {
        let base = directory_url(base);
        let add_node = base.join(ADD_NODE)?;
        let inner = reqwest::blocking::Client::builder().build()?;

        Ok(Client {
            inner,
            base,
            add_node,
        })
    }

    /// Resolves a controller route relative to the base url.
    pub fn endpoint(&self, name: &str) -> Result<Url> {
        Ok(self.base.join(name)?)
    }

    pub fn add_node(&self, id: NodeId) -> Result<StatusCode, reqwest::Error> {
        let resp = self
            .inner
            .post(self.add_node.clone())
            .json(&AddNode { node_id: id })
            .send()?;
        let status = resp.status();
        trace!(TraceLevel::TRACE, node_id = id, status = status.as_u16(), "add_node");
        Ok(status)
    }

    pub fn checkpoint(&self) -> Result<StatusCode> {
        let url = self.endpoint(CHECKPOINT)?;
        let resp = self.inner.post(url).send()?;
        let status = resp.status();
        trace!(TraceLevel::DEBUG, status = status.as_u16(), "checkpoint");
        Ok(status)
    }
}

impl NodeSink for Client {
    fn add_node(&mut self, id: NodeId) -> Result<StatusCode, reqwest::Error> {
        Client::add_node(self, id)
    }

    fn target(&self) -> &Url {
        &self.add_node
    }
}

/// `Url::join` replaces the last segment unless the path ends with a slash,
/// so `http://host/api/v1` would otherwise resolve to `http://host/api/add_node`.
fn directory_url(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
