use serde::{de, Deserialize, Deserializer};

/// The parts of an exported route we care about.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub host: String,
    pub target_port: Option<String>,
}

impl RouteDescriptor {
    /// Parses the YAML produced by `oc export route <name> -o yaml`.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let route: RouteExport = serde_yaml::from_str(yaml)?;

        Ok(Self {
            host: route.spec.host,
            target_port: route.spec.port.map(|port| match port.target_port {
                TargetPort::Name(name) => name,
                TargetPort::Number(number) => number.to_string(),
            }),
        })
    }

    /// Routes are always exposed over plain HTTP.
    pub fn url(&self) -> String {
        format!("http://{}", self.host)
    }
}

#[derive(Debug, Deserialize)]
struct RouteExport {
    spec: RouteSpec,
}

#[derive(Debug, Deserialize)]
struct RouteSpec {
    #[serde(deserialize_with = "non_empty")]
    host: String,
    port: Option<RoutePort>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutePort {
    target_port: TargetPort,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetPort {
    Name(String),
    Number(u16),
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let host = String::deserialize(deserializer)?;
    if host.trim().is_empty() {
        return Err(de::Error::custom("route has an empty host"));
    }
    Ok(host)
}
