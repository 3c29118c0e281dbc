use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Topic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicNode {
    pub label: String,
    pub kind: NodeKind,
}

/// Bipartite document↔topic graph. Undirected, no duplicate edges; nodes
/// and edges keep first-seen order. Built fresh per query, not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicGraph {
    nodes: Vec<TopicNode>,
    edges: Vec<(usize, usize)>,
}

impl TopicGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from per-document topic lists: one document node per
    /// entry, one topic node per distinct topic, one edge per
    /// (document, topic) pair.
    pub fn build(document_topics: &[(String, Vec<String>)]) -> Self {
        let mut graph = Self::new();
        for (document, topics) in document_topics {
            graph.add_document(document, topics);
        }
        graph
    }

    /// Adds one document and its topics, reusing existing nodes and
    /// dropping blank or duplicate entries.
    pub fn add_document(&mut self, document: &str, topics: &[String]) {
        let document_index = self.intern(document, NodeKind::Document);

        for topic in topics {
            let topic = topic.trim();
            if topic.is_empty() {
                continue;
            }
            let topic_index = self.intern(topic, NodeKind::Topic);
            self.add_edge(document_index, topic_index);
        }
    }

    pub fn nodes(&self) -> &[TopicNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Labels of nodes adjacent to the node at `index`, in edge insertion
    /// order.
    pub fn neighbors(&self, index: usize) -> Vec<&str> {
        self.edges
            .iter()
            .filter_map(|&(left, right)| {
                if left == index {
                    Some(self.nodes[right].label.as_str())
                } else if right == index {
                    Some(self.nodes[left].label.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    fn intern(&mut self, label: &str, kind: NodeKind) -> usize {
        if let Some(position) = self
            .nodes
            .iter()
            .position(|node| node.kind == kind && node.label == label)
        {
            return position;
        }

        self.nodes.push(TopicNode {
            label: label.to_string(),
            kind,
        });
        self.nodes.len() - 1
    }

    fn add_edge(&mut self, left: usize, right: usize) {
        let edge = (left.min(right), left.max(right));
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }
}

/// Best-effort split of a loosely delimited topic list: comma- or
/// newline-separated fragments, trimmed, with empties and leading list
/// markers dropped. Never fails; non-blank input yields at least one
/// topic.
pub fn split_topic_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(|fragment| fragment.trim().trim_start_matches(['-', '*', ' ']).trim())
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}
