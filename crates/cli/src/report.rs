use anyhow::Result;
use serde::Serialize;
use voyage_graph::{Chain, ChainNode, Connection, DepthMap, GraphStats};

#[derive(Debug, Serialize)]
pub struct DepthsOutput {
    pub rows: usize,
    /// False when auto-run is disabled and the call was not forced
    pub ran: bool,
    pub max_depth: usize,
    pub depths: DepthMap,
}

impl DepthsOutput {
    pub fn new(rows: usize, ran: bool, depths: DepthMap) -> Self {
        Self {
            rows,
            ran,
            max_depth: depths.values().copied().max().unwrap_or(0),
            depths,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChainOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    pub length: usize,
    pub chain: Vec<ChainNode>,
}

impl ChainOutput {
    pub fn new(start: Option<usize>, chain: Chain) -> Self {
        Self {
            start,
            length: chain.len(),
            chain: chain.nodes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GraphOutput {
    pub stats: GraphStats,
    pub connections: Vec<Connection>,
}

pub fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
