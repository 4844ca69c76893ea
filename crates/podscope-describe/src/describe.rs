use podscope_types::{
    Container, Event, Manifest, OrderedMap, PodDescription, PortMapping, Volume, display_value,
};

/// Placeholder for fields the backend left out
pub const NONE_PLACEHOLDER: &str = "<none>";

/// Protocol Kubernetes assumes when a port omits one
const DEFAULT_PROTOCOL: &str = "TCP";

/// Render a pod description as a `kubectl describe`-style report.
///
/// Sections appear in a fixed order (events, manifest, containers, volumes)
/// and every sequence keeps its input order. The output depends only on the
/// input, so rendering the same description twice yields identical text.
pub fn format_pod_description(details: &PodDescription) -> String {
    let mut report = Report::default();

    report.line(0, "=== Events ===");
    if details.events.is_empty() {
        report.line(0, "No events found");
        report.blank();
    } else {
        for event in &details.events {
            write_event(&mut report, event);
        }
    }

    report.line(0, "=== Pod Manifest ===");
    write_manifest(&mut report, &details.manifest);

    report.blank();
    report.line(0, "Containers:");
    for container in &details.manifest.containers {
        write_container(&mut report, container);
    }

    if let Some(volumes) = details.manifest.volumes.as_deref().filter(|v| !v.is_empty()) {
        report.line(0, "Volumes:");
        for volume in volumes {
            write_volume(&mut report, volume);
        }
    }

    report.finish()
}

/// Line-oriented text builder with two-space indentation levels
#[derive(Default)]
struct Report {
    out: String,
}

impl Report {
    fn line(&mut self, level: usize, text: impl AsRef<str>) {
        for _ in 0..level {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Manifest field, value aligned at column 14
    fn field(&mut self, label: &str, value: impl AsRef<str>) {
        self.line(0, format!("{:<13} {}", label, value.as_ref()));
    }

    /// Container field, value aligned at column 15 of its level
    fn container_field(&mut self, label: &str, value: impl AsRef<str>) {
        self.line(2, format!("{:<14} {}", label, value.as_ref()));
    }

    fn finish(self) -> String {
        self.out
    }
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or(NONE_PLACEHOLDER)
}

fn write_event(report: &mut Report, event: &Event) {
    report.line(0, format!("Type: {}", or_none(event.kind.as_deref())));
    report.line(0, format!("Reason: {}", or_none(event.reason.as_deref())));
    report.line(0, format!("Message: {}", or_none(event.message.as_deref())));
    report.line(
        0,
        format!("Last Timestamp: {}", or_none(event.last_timestamp.as_deref())),
    );
    match event.count {
        Some(count) => report.line(0, format!("Count: {}", count)),
        None => report.line(0, format!("Count: {}", NONE_PLACEHOLDER)),
    }
    if let Some(component) = event.source.component.as_deref().filter(|c| !c.is_empty()) {
        report.line(0, format!("Source Component: {}", component));
    }
    if let Some(host) = event.source.host.as_deref().filter(|h| !h.is_empty()) {
        report.line(0, format!("Source Host: {}", host));
    }
    report.blank();
}

fn write_manifest(report: &mut Report, manifest: &Manifest) {
    report.field("Name:", or_none(manifest.name.as_deref()));
    report.field("Namespace:", or_none(manifest.namespace.as_deref()));
    // Zero is the cluster default and is not worth a line
    if let Some(priority) = manifest.priority.filter(|p| *p != 0) {
        report.field("Priority:", priority.to_string());
    }
    report.field("Node:", or_none(manifest.node.as_deref()));
    if let Some(start_time) = &manifest.start_time {
        report.field("Start Time:", start_time);
    }

    if let Some(labels) = &manifest.labels {
        report.field("Labels:", join_pairs(labels));
    }
    if let Some(annotations) = &manifest.annotations {
        report.field("Annotations:", join_pairs(annotations));
    }

    report.field("Status:", or_none(manifest.status.as_deref()));
    report.field("IP:", or_none(manifest.ip.as_deref()));
    if let Some(ips) = &manifest.ips {
        report.field("IPs:", ips.join(", "));
    }
    if let Some(owner) = &manifest.controlled_by {
        report.field("Controlled By:", owner);
    }
}

fn join_pairs(map: &OrderedMap) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_ports(ports: Option<&[PortMapping]>) -> String {
    let rendered: Vec<String> = ports
        .unwrap_or_default()
        .iter()
        .filter_map(|p| {
            let port = p.port?;
            let protocol = p.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL);
            Some(format!("{}/{}", port, protocol))
        })
        .collect();

    if rendered.is_empty() {
        NONE_PLACEHOLDER.to_string()
    } else {
        rendered.join(", ")
    }
}

fn write_container(report: &mut Report, container: &Container) {
    report.line(1, format!("{}:", container.name));
    report.container_field("Container ID:", or_none(container.container_id.as_deref()));
    report.container_field("Image:", or_none(container.image.as_deref()));
    report.container_field("Image ID:", or_none(container.image_id.as_deref()));

    report.container_field("Port:", join_ports(container.ports.as_deref()));
    report.container_field("Host Port:", join_ports(container.host_ports.as_deref()));

    write_list(report, "Command:", container.command.as_deref());
    write_list(report, "Args:", container.args.as_deref());

    report.container_field("State:", or_none(container.state.as_deref()));
    let ready = match &container.ready {
        Some(value) if !value.is_null() => display_value(value),
        _ => "null".to_string(),
    };
    report.container_field("Ready:", ready);
    report.container_field("Restart Count:", container.restart_count.to_string());

    if let Some(environment) = container.environment.as_deref().filter(|e| !e.is_empty()) {
        report.line(2, "Environment:");
        for env in environment {
            let value = match (&env.value, &env.value_from) {
                (Some(value), _) if !value.is_empty() => Some(value.clone()),
                (_, Some(from)) if podscope_types::is_truthy(from) => Some(display_value(from)),
                _ => None,
            };
            if let Some(value) = value {
                report.line(3, format!("{}={}", env.name, value));
            }
        }
    }

    if let Some(mounts) = container.mounts.as_deref().filter(|m| !m.is_empty()) {
        report.line(2, "Mounts:");
        for mount in mounts {
            let mode = if mount.read_only.unwrap_or(false) { "ro" } else { "rw" };
            report.line(
                3,
                format!(
                    "{} from {} ({})",
                    mount.name,
                    or_none(mount.mount_path.as_deref()),
                    mode
                ),
            );
        }
    }

    if let Some(resources) = &container.resources {
        report.line(2, "Resources:");
        write_quantities(report, "Requests:", resources.requests.as_ref());
        write_quantities(report, "Limits:", resources.limits.as_ref());
    }

    report.blank();
}

fn write_list(report: &mut Report, label: &str, entries: Option<&[String]>) {
    let Some(entries) = entries.filter(|e| !e.is_empty()) else {
        return;
    };
    report.line(2, label);
    for entry in entries {
        report.line(3, entry);
    }
}

fn write_quantities(report: &mut Report, label: &str, quantities: Option<&OrderedMap>) {
    let Some(quantities) = quantities.filter(|q| !q.is_empty()) else {
        return;
    };
    report.line(3, label);
    for (name, amount) in quantities.iter() {
        report.line(4, format!("{}: {}", name, amount));
    }
}

fn write_volume(report: &mut Report, volume: &Volume) {
    report.line(1, format!("{}:", volume.name));
    for (kind, descriptor) in volume.present_sources() {
        report.line(2, format!("Type: {}", kind));
        report.line(2, display_value(descriptor));
    }
}
