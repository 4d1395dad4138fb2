//! Cliente del servicio de flota.

use logiflow_core::{GatewayError, HttpService};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::{fetch, fetch_optional};

/// Conteo de repartidores activos por estado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: u64,
    pub disponibles: u64,
    pub en_ruta: u64,
    pub mantenimiento: u64,
    pub desconectados: u64,
}

impl FleetSummary {
    /// Agrega sobre los repartidores con `activo == true`.
    pub fn from_drivers(drivers: &[Value]) -> Self {
        let mut summary = Self::default();

        for driver in drivers {
            if driver.get("activo").and_then(Value::as_bool) != Some(true) {
                continue;
            }
            summary.total += 1;
            match driver.get("estado").and_then(Value::as_str) {
                Some("DISPONIBLE") => summary.disponibles += 1,
                Some("EN_RUTA") => summary.en_ruta += 1,
                Some("MANTENIMIENTO") => summary.mantenimiento += 1,
                Some("INACTIVO" | "DESCONECTADO") => summary.desconectados += 1,
                _ => {},
            }
        }

        summary
    }
}

/// Acceso a `/repartidores` y `/vehiculos` del servicio de flota.
#[derive(Clone)]
pub struct FleetClient {
    http: HttpService,
}

impl FleetClient {
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// GET /repartidores
    #[instrument(skip_all)]
    pub async fn drivers(&self) -> Result<Vec<Value>, GatewayError> {
        match fetch(&self.http, "/repartidores".to_string()).await? {
            Value::Array(drivers) => Ok(drivers),
            Value::Null => Ok(Vec::new()),
            other => Err(GatewayError::Decode(format!(
                "expected a list of drivers, got {other}"
            ))),
        }
    }

    /// GET /repartidores/{id}
    #[instrument(skip(self))]
    pub async fn driver(&self, id: &str) -> Result<Option<Value>, GatewayError> {
        fetch_optional(&self.http, format!("/repartidores/{id}")).await
    }

    /// GET /vehiculos/{id}
    #[instrument(skip(self))]
    pub async fn vehicle(&self, id: &str) -> Result<Option<Value>, GatewayError> {
        fetch_optional(&self.http, format!("/vehiculos/{id}")).await
    }

    /// KPI de la flota calculado a partir de `drivers()`.
    pub async fn summary(&self) -> Result<FleetSummary, GatewayError> {
        let drivers = self.drivers().await?;
        Ok(FleetSummary::from_drivers(&drivers))
    }
}

impl std::fmt::Debug for FleetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetClient").finish_non_exhaustive()
    }
}
