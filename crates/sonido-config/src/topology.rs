//! Topology JSON serializer.
//!
//! Format: a root object with one key `NodeGraphGroup`, shaped
//! after `original_source`'s `NodeIOMapping`/`NodeIOValues`
//! (`NodeGraphGroup.h`) — an array of nodes (`TypeId`, `NodeId`, optional
//! `Position`, optional `ConstantInputs`) and an array of links (`src`,
//! `srcCh`, `dst`, `dstCh`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use sonido_registry::{ArchiveData, LinkArchive, NodeArchive, NodeId, TypeId};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConstantInputJson {
    ch: u8,
    value: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeJson {
    #[serde(rename = "TypeId")]
    type_id: u32,
    #[serde(rename = "NodeId")]
    node_id: u32,
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(rename = "Position", default, skip_serializing_if = "Option::is_none")]
    position: Option<(f32, f32)>,
    #[serde(rename = "ConstantInputs", default, skip_serializing_if = "Vec::is_empty")]
    constant_inputs: Vec<ConstantInputJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinkJson {
    src: u32,
    #[serde(rename = "srcCh")]
    src_ch: u8,
    dst: u32,
    #[serde(rename = "dstCh")]
    dst_ch: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroupJson {
    #[serde(rename = "Nodes")]
    nodes: Vec<NodeJson>,
    #[serde(rename = "Links")]
    links: Vec<LinkJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RootJson {
    #[serde(rename = "NodeGraphGroup")]
    node_graph_group: GroupJson,
}

impl From<&ArchiveData> for RootJson {
    fn from(archive: &ArchiveData) -> Self {
        let nodes = archive
            .nodes
            .iter()
            .map(|n| NodeJson {
                type_id: n.type_id.0,
                node_id: n.node_id.0,
                name: n.name.clone(),
                position: None,
                constant_inputs: n.constants.iter().map(|&(ch, value)| ConstantInputJson { ch, value }).collect(),
            })
            .collect();
        let links = archive
            .links
            .iter()
            .map(|l| LinkJson { src: l.src.0, src_ch: l.src_ch, dst: l.dst.0, dst_ch: l.dst_ch })
            .collect();
        RootJson { node_graph_group: GroupJson { nodes, links } }
    }
}

impl From<RootJson> for ArchiveData {
    fn from(root: RootJson) -> Self {
        let nodes = root
            .node_graph_group
            .nodes
            .into_iter()
            .map(|n| NodeArchive {
                type_id: TypeId(n.type_id),
                node_id: NodeId(n.node_id),
                name: n.name,
                constants: n.constant_inputs.into_iter().map(|c| (c.ch, c.value)).collect(),
            })
            .collect();
        let links = root
            .node_graph_group
            .links
            .into_iter()
            .map(|l| LinkArchive { src: NodeId(l.src), src_ch: l.src_ch, dst: NodeId(l.dst), dst_ch: l.dst_ch })
            .collect();
        ArchiveData { nodes, links }
    }
}

/// Serialize an archived topology to a pretty-printed JSON string.
pub fn to_json(archive: &ArchiveData) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(&RootJson::from(archive))?)
}

/// Parse a topology from a JSON string. Unknown keys are ignored; a
/// link or node referencing a missing id is *not* rejected here — that's
/// `Schema::load_archive_data`'s job (it logs a `DeserializationSkip`
/// warning and continues), since this function only knows about the wire
/// format, not the live graph.
pub fn from_json(json: &str) -> Result<ArchiveData, ConfigError> {
    let root: RootJson = serde_json::from_str(json)?;
    Ok(root.into())
}

/// Write an archived topology to a JSON file, creating parent directories
/// as needed.
pub fn save_to_path(archive: &ArchiveData, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
    }
    let json = to_json(archive)?;
    std::fs::write(path, json).map_err(|e| ConfigError::write_file(path, e))
}

/// Read and parse a topology from a JSON file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ArchiveData, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    from_json(&content)
}
