//! HTTP protocol client for the gear daemon.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{GearError, GearResult};
use crate::unit::{PortMap, Unit};

/// Well-known TCP port the gear daemon listens on.
pub const GEAR_PORT: u16 = 43273;

/// Client for one gear daemon's HTTP control API.
///
/// A `GearClient` is a pure function of the daemon's host and port plus the
/// HTTP transport it holds; it keeps no other state between calls, so one
/// instance can be shared freely across tasks. The daemon's unit namespace
/// is the only shared mutable resource, and the daemon alone serializes
/// access to it: two concurrent calls for the same unit name race at the
/// daemon, with daemon-defined outcomes.
///
/// No operation retries or applies a timeout. Dropping an in-flight call
/// abandons the HTTP exchange; a request that already reached the daemon is
/// not rolled back.
#[derive(Debug, Clone)]
pub struct GearClient {
    client: Client,
    base: String,
}

/// Wire shape of the create request.
#[derive(Serialize)]
struct CreateRequest<'a> {
    image: &'a str,
    ports: &'a [PortMap],
    links: &'a [PortMap],
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(rename = "Containers")]
    containers: Vec<ContainerRecord>,
}

// The daemon's records carry more fields than the client models; extras
// are ignored on parse.
#[derive(Deserialize)]
struct ContainerRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Image")]
    image: Option<String>,
    #[serde(rename = "SubState")]
    sub_state: String,
}

impl GearClient {
    /// Create a client for a daemon on `host` at the well-known port.
    pub fn new(host: impl AsRef<str>) -> Self {
        Self::with_port(host, GEAR_PORT)
    }

    /// Create a client for a daemon on `host` at `port`.
    pub fn with_port(host: impl AsRef<str>, port: u16) -> Self {
        // Each request rides a fresh connection; idle connections are
        // never reused across calls.
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .expect("reqwest client with default settings");
        Self {
            client,
            base: format!("http://{}:{}", host.as_ref(), port),
        }
    }

    /// Create a client for a daemon on the local loopback interface.
    pub fn local() -> Self {
        Self::new("127.0.0.1")
    }

    /// Check whether a unit named `unit_name` is known to the daemon.
    ///
    /// A unit that exists is not necessarily running yet; existence only
    /// means the daemon has accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`GearError`](crate::GearError) for any status other than
    /// success or not-found, and a transport error if the exchange fails.
    pub async fn exists(&self, unit_name: &str) -> GearResult<bool> {
        let url = self.container_url(unit_name);
        tracing::debug!(url = %url, unit = unit_name, "Checking unit existence");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            let body = response.text().await?;
            Err(GearError::new(status, body).into())
        }
    }

    /// Create a unit, unless one with that name already exists.
    ///
    /// The existence check makes repeated calls with the same name safe for
    /// callers that do not track prior state themselves, at the cost of an
    /// extra round trip. The check-then-act window is open: daemon state
    /// may change between the two requests, and callers needing strict
    /// create-or-fail semantics must not rely on this idempotence.
    ///
    /// Success means the daemon accepted the unit, not that its workload is
    /// serving; poll [`list`](Self::list) for the `running` sub-state.
    ///
    /// # Errors
    ///
    /// Returns [`GearError`](crate::GearError) when the daemon rejects the
    /// creation (illegal names included; nothing is validated locally), and
    /// a transport error if an exchange fails.
    pub async fn add(
        &self,
        unit_name: &str,
        image_name: &str,
        ports: &[PortMap],
        links: &[PortMap],
    ) -> GearResult<()> {
        if self.exists(unit_name).await? {
            tracing::debug!(unit = unit_name, "Unit already present, add is a no-op");
            return Ok(());
        }

        let url = self.container_url(unit_name);
        tracing::debug!(
            url = %url,
            unit = unit_name,
            image = image_name,
            "Creating unit"
        );

        let request = CreateRequest {
            image: image_name,
            ports,
            links,
        };
        let response = self.client.put(&url).json(&request).send().await?;
        ensure_ok(response).await?;
        Ok(())
    }

    /// Remove a unit.
    ///
    /// Removing a nonexistent or illegally named unit fails with
    /// [`GearError`](crate::GearError) rather than silently succeeding;
    /// callers wanting idempotent removal must inspect the error.
    ///
    /// # Errors
    ///
    /// Returns [`GearError`](crate::GearError) for any non-success status,
    /// and a transport error if the exchange fails.
    pub async fn remove(&self, unit_name: &str) -> GearResult<()> {
        let url = self.container_url(unit_name);
        tracing::debug!(url = %url, unit = unit_name, "Removing unit");

        let response = self.client.delete(&url).send().await?;
        ensure_ok(response).await?;
        Ok(())
    }

    /// Fetch the daemon's full unit listing.
    ///
    /// A read-only snapshot, never cached. Callers use it to discover
    /// whether a just-added unit has reached the `running` sub-state; that
    /// transition is never awaited here.
    ///
    /// # Errors
    ///
    /// Returns [`GearError`](crate::GearError) for any non-success status,
    /// and a transport error if the exchange or body decode fails.
    pub async fn list(&self) -> GearResult<Vec<Unit>> {
        let url = format!("{}/containers", self.base);
        tracing::debug!(url = %url, "Listing units");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(GearError::new(status, body).into());
        }

        let listing: ListResponse = response.json().await?;
        Ok(listing
            .containers
            .into_iter()
            .map(|record| Unit {
                name: record.id,
                image: record.image,
                sub_state: record.sub_state,
            })
            .collect())
    }

    fn container_url(&self, unit_name: &str) -> String {
        format!("{}/container/{}", self.base, unit_name)
    }
}

/// Read the response body and fail unless the status reports success.
async fn ensure_ok(response: Response) -> GearResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(GearError::new(status, body).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_target_the_configured_daemon() {
        let client = GearClient::with_port("10.0.0.5", 8080);
        assert_eq!(
            client.container_url("web1"),
            "http://10.0.0.5:8080/container/web1"
        );

        let local = GearClient::local();
        assert_eq!(
            local.container_url("db"),
            format!("http://127.0.0.1:{GEAR_PORT}/container/db")
        );
    }

    #[test]
    fn create_request_wire_shape() {
        let ports = vec![PortMap::new(8080, 9000)];
        let links = vec![PortMap::new(31337, 4001).with_internal_address("10.0.0.5")];
        let request = CreateRequest {
            image: "busybox-http",
            ports: &ports,
            links: &links,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "image": "busybox-http",
                "ports": [{"internal_port": 8080, "external_port": 9000}],
                "links": [{
                    "internal_port": 31337,
                    "external_port": 4001,
                    "internal_address": "10.0.0.5"
                }]
            })
        );
    }

    #[test]
    fn listing_parses_daemon_records() {
        let raw = json!({
            "Containers": [
                {
                    "Id": "web1",
                    "Image": "busybox-http",
                    "ActiveState": "active",
                    "LoadState": "loaded",
                    "SubState": "running"
                },
                {"Id": "db1", "SubState": "start"}
            ]
        });

        let listing: ListResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.containers.len(), 2);
        assert_eq!(listing.containers[0].id, "web1");
        assert_eq!(listing.containers[0].image.as_deref(), Some("busybox-http"));
        assert_eq!(listing.containers[0].sub_state, "running");
        assert_eq!(listing.containers[1].id, "db1");
        assert_eq!(listing.containers[1].image, None);
    }
}
