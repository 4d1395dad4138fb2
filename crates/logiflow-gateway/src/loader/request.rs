//! Loaders por request sobre el cliente de flota.

use futures::future::{BoxFuture, try_join_all};
use serde_json::Value;

use super::{BatchLoader, FnBatch, LoadError};
use crate::clients::FleetClient;

/// Loaders de repartidores y vehiculos de un request entrante.
///
/// Se construyen de nuevo para cada request: nunca comparten memo entre
/// requests distintos.
#[derive(Debug)]
pub struct RequestLoaders {
    pub drivers: BatchLoader<String, Option<Value>>,
    pub vehicles: BatchLoader<String, Option<Value>>,
}

impl RequestLoaders {
    pub fn new(fleet: &FleetClient) -> Self {
        let for_drivers = fleet.clone();
        let for_vehicles = fleet.clone();

        Self {
            drivers: BatchLoader::new(
                "drivers",
                FnBatch(move |ids: Vec<String>| {
                    let fleet = for_drivers.clone();
                    async move {
                        // El backend no tiene endpoint batch: fan-out concurrente
                        try_join_all(ids.iter().map(|id| fleet.driver(id)))
                            .await
                            .map_err(LoadError::from)
                    }
                }),
            ),
            vehicles: BatchLoader::new(
                "vehicles",
                FnBatch(move |ids: Vec<String>| {
                    let fleet = for_vehicles.clone();
                    async move {
                        try_join_all(ids.iter().map(|id| fleet.vehicle(id)))
                            .await
                            .map_err(LoadError::from)
                    }
                }),
            ),
        }
    }

    /// Agrega `repartidor` y `vehiculo` a un pedido.
    ///
    /// Los `load` se registran antes de retornar el future, asi que varios
    /// pedidos enriquecidos juntos comparten un solo batch por loader.
    pub fn enrich_order(&self, mut order: Value) -> BoxFuture<'static, Result<Value, LoadError>> {
        let driver = related_id(&order, "repartidorId").map(|id| self.drivers.load(id));
        let vehicle = related_id(&order, "vehiculoId").map(|id| self.vehicles.load(id));

        Box::pin(async move {
            let driver = match driver {
                Some(load) => load.await?,
                None => None,
            };
            let vehicle = match vehicle {
                Some(load) => load.await?,
                None => None,
            };

            if let Some(fields) = order.as_object_mut() {
                fields.insert("repartidor".to_string(), driver.unwrap_or(Value::Null));
                fields.insert("vehiculo".to_string(), vehicle.unwrap_or(Value::Null));
            }
            Ok(order)
        })
    }
}

fn related_id(order: &Value, field: &str) -> Option<String> {
    match order.get(field)? {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
