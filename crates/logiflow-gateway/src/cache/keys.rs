//! Cache key generation.

use std::fmt;

/// Key de cache para los recursos del gateway.
/// Los ids se normalizan (trim) para que ` 42` y `42` compartan entrada.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Listado completo de repartidores
    Drivers,
    /// Un repartidor por id
    Driver(String),
    /// Un vehiculo por id
    Vehicle(String),
    /// Resumen (KPI) de la flota
    FleetSummary,
    /// Un pedido enriquecido por id
    Order(String),
}

impl CacheKey {
    pub fn driver(id: &str) -> Self {
        Self::Driver(id.trim().to_string())
    }

    pub fn vehicle(id: &str) -> Self {
        Self::Vehicle(id.trim().to_string())
    }

    pub fn order(id: &str) -> Self {
        Self::Order(id.trim().to_string())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drivers => f.write_str("repartidores"),
            Self::Driver(id) => write!(f, "repartidor:{id}"),
            Self::Vehicle(id) => write!(f, "vehiculo:{id}"),
            Self::FleetSummary => f.write_str("flota:resumen"),
            Self::Order(id) => write!(f, "pedido:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(CacheKey::Drivers.to_string(), "repartidores");
        assert_eq!(CacheKey::driver("r-1").to_string(), "repartidor:r-1");
        assert_eq!(CacheKey::vehicle("v-2").to_string(), "vehiculo:v-2");
        assert_eq!(CacheKey::FleetSummary.to_string(), "flota:resumen");
        assert_eq!(CacheKey::order("p-3").to_string(), "pedido:p-3");
    }

    #[test]
    fn test_ids_are_trimmed() {
        assert_eq!(CacheKey::driver(" r-1 "), CacheKey::driver("r-1"));
    }
}
