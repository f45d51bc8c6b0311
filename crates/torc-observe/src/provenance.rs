//! Provenance view: creation/edit history per node.

use serde_json::json;
use torc_core::graph::Graph;

use crate::error::ObserveError;
use crate::format::node_display_name;
use crate::view::{RenderContext, View, ViewKind, ViewOutput};

/// Provenance view showing creation and edit history.
pub struct ProvenanceView;

impl View for ProvenanceView {
    fn kind(&self) -> ViewKind {
        ViewKind::Provenance
    }

    fn render(&self, graph: &Graph, _ctx: &RenderContext<'_>) -> Result<ViewOutput, ObserveError> {
        let mut entries = Vec::new();

        for node in graph.nodes() {
            if let Some(ref prov) = node.provenance {
                let name = node_display_name(node);
                let kind = format!("{}", node.kind);
                entries.push((name, kind, node.id, prov));
            }
        }

        // Sort by name for stable output
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        if entries.is_empty() {
            return Ok(ViewOutput {
                text: "No provenance data recorded.\n".to_string(),
                data: json!({
                    "view": "provenance",
                    "nodes": [],
                    "total": 0,
                }),
            });
        }

        let mut text = String::new();
        text.push_str("=== Provenance ===\n\n");

        let mut json_nodes = Vec::new();

        for (name, kind, node_id, prov) in &entries {
            let short_id = &node_id.to_string()[..8];
            text.push_str(&format!("{name} [{kind}] (uuid: {short_id}...)\n"));
            text.push_str(&format!("  Created: {} by {}\n", prov.created, prov.created_by));
            text.push_str(&format!("  Reason:  {}\n", prov.creation_reason));

            if !prov.requirements.is_empty() {
                text.push_str("  Requirements:\n");
                for req in &prov.requirements {
                    let doc = req
                        .document
                        .as_deref()
                        .map(|d| format!(" ({d})"))
                        .unwrap_or_default();
                    let desc = req
                        .description
                        .as_deref()
                        .map(|d| format!(" — {d}"))
                        .unwrap_or_default();
                    text.push_str(&format!("    {}{doc}{desc}\n", req.id));
                }
            }

            if !prov.edit_history.is_empty() {
                let n = prov.edit_history.len();
                let plural = if n == 1 { "edit" } else { "edits" };
                text.push_str(&format!("  Edit history ({n} {plural}):\n"));
                for edit in &prov.edit_history {
                    text.push_str(&format!(
                        "    {} by {}: {}\n",
                        edit.timestamp, edit.author, edit.description
                    ));
                }
            }

            text.push('\n');

            // JSON
            let json_reqs: Vec<_> = prov
                .requirements
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id,
                        "document": r.document,
                        "description": r.description,
                    })
                })
                .collect();

            let json_edits: Vec<_> = prov
                .edit_history
                .iter()
                .map(|e| {
                    json!({
                        "timestamp": e.timestamp,
                        "author": format!("{}", e.author),
                        "description": e.description,
                        "previous_hash": e.previous_hash,
                    })
                })
                .collect();

            json_nodes.push(json!({
                "node_id": node_id.to_string(),
                "name": name,
                "kind": kind,
                "created": prov.created,
                "created_by": format!("{}", prov.created_by),
                "creation_reason": prov.creation_reason,
                "requirements": json_reqs,
                "edit_history": json_edits,
            }));
        }

        text.push_str(&format!("{} nodes with provenance data.\n", entries.len()));

        let data = json!({
            "view": "provenance",
            "nodes": json_nodes,
            "total": entries.len(),
        });

        Ok(ViewOutput { text, data })
    }
}
