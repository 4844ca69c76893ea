//! Shared types for podscope
//!
//! This crate contains the payloads exchanged with the podscope backend and
//! the small amount of presentation metadata attached to them.

pub mod de;

use std::fmt;

use ratatui::style::Color;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use de::{OrderedMap, display_value, is_truthy};
use de::nullable;

/// Pseudo-context that asks the backend for pods across every context
pub const ALL_CONTEXTS: &str = "all";

// ============================================================================
// Pod listing
// ============================================================================

/// A single row of the pod table
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PodSummary {
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub namespace: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub restarts: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub context: String,
}

impl PodSummary {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            status: None,
            age: None,
            restarts: 0,
            context: context.into(),
        }
    }

    pub fn phase(&self) -> PodPhase {
        self.status
            .as_deref()
            .map(PodPhase::from)
            .unwrap_or(PodPhase::Unknown)
    }

    /// Reference used to address this pod on the logs and describe endpoints
    pub fn pod_ref(&self) -> PodRef {
        PodRef {
            context: self.context.clone(),
            namespace: self.namespace.clone(),
            pod: self.name.clone(),
        }
    }
}

/// Address of a pod on the backend
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PodRef {
    pub context: String,
    pub namespace: String,
    pub pod: String,
}

impl PodRef {
    pub fn new(context: impl Into<String>, namespace: impl Into<String>, pod: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            namespace: namespace.into(),
            pod: pod.into(),
        }
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.context, self.namespace, self.pod)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl From<&str> for PodPhase {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl PodPhase {
    /// Get display color for this phase
    pub fn color(&self) -> Color {
        match self {
            Self::Pending => Color::Yellow,
            Self::Running => Color::Green,
            Self::Succeeded => Color::Blue,
            Self::Failed => Color::Red,
            Self::Unknown => Color::DarkGray,
        }
    }
}

// ============================================================================
// Pod description
// ============================================================================

/// Events and manifest returned by the describe endpoint
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PodDescription {
    #[serde(deserialize_with = "nullable")]
    pub events: Vec<Event>,
    #[serde(deserialize_with = "nullable")]
    pub manifest: Manifest,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub last_timestamp: Option<String>,
    pub count: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub source: EventSource,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventSource {
    pub component: Option<String>,
    pub host: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub priority: Option<i64>,
    pub node: Option<String>,
    pub start_time: Option<String>,
    pub labels: Option<OrderedMap>,
    pub annotations: Option<OrderedMap>,
    pub status: Option<String>,
    pub ip: Option<String>,
    pub ips: Option<Vec<String>>,
    pub controlled_by: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub containers: Vec<Container>,
    pub volumes: Option<Vec<Volume>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Container {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub image: Option<String>,
    pub container_id: Option<String>,
    pub image_id: Option<String>,
    pub state: Option<String>,
    /// Usually a boolean, shown verbatim whatever it is
    pub ready: Option<Value>,
    #[serde(deserialize_with = "nullable")]
    pub restart_count: i64,
    pub ports: Option<Vec<PortMapping>>,
    pub host_ports: Option<Vec<PortMapping>>,
    pub command: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub environment: Option<Vec<EnvVar>>,
    pub mounts: Option<Vec<Mount>>,
    pub resources: Option<Resources>,
}

/// A container or host port; the backend names the number field after its kind
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortMapping {
    #[serde(alias = "container_port", alias = "host_port")]
    pub port: Option<i64>,
    pub protocol: Option<String>,
}

impl PortMapping {
    pub fn new(port: i64, protocol: &str) -> Self {
        Self {
            port: Some(port),
            protocol: Some(protocol.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnvVar {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub value: Option<String>,
    pub value_from: Option<Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Mount {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub mount_path: Option<String>,
    pub read_only: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub requests: Option<OrderedMap>,
    pub limits: Option<OrderedMap>,
}

/// A pod volume: a name plus one entry per volume-type tag
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Volume {
    pub name: String,
    /// Every key except `name`, in wire order
    pub sources: Vec<(String, Value)>,
}

impl Volume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, kind: impl Into<String>, descriptor: Value) -> Self {
        self.sources.push((kind.into(), descriptor));
        self
    }

    /// Sources that are actually set (non-null, non-empty)
    pub fn present_sources(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.sources
            .iter()
            .filter(|(_, v)| is_truthy(v))
            .map(|(k, v)| (k.as_str(), v))
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VolumeVisitor;

        impl<'de> Visitor<'de> for VolumeVisitor {
            type Value = Volume;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a volume object with a name")
            }

            fn visit_map<A>(self, access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut name = None;
                let mut sources = Vec::new();
                for (key, value) in de::ordered_entries(access)? {
                    if key == "name" {
                        name = Some(display_value(&value));
                    } else {
                        sources.push((key, value));
                    }
                }
                let name = name.ok_or_else(|| de::missing::<A::Error>("name"))?;
                Ok(Volume { name, sources })
            }
        }

        deserializer.deserialize_map(VolumeVisitor)
    }
}

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContextsResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub contexts: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PodsResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub pods: Vec<PodSummary>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogsResponse {
    pub logs: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DescribeResponse {
    pub pod_details: Option<PodDescription>,
    pub error: Option<String>,
}

/// Pull a non-empty `error` field out of a response envelope
pub fn backend_error(error: Option<String>) -> Option<String> {
    error.filter(|e| !e.is_empty())
}
