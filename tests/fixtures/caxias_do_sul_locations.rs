//! Caxias do Sul locations for realistic test fixtures.
//!
//! Coordinates are approximate street-level positions around the city
//! centre, where the municipal collection fleet runs from the Codeca garage.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Depot
// ============================================================================

pub const CODECA_GARAGE: Location = Location::new("Codeca (Garagem)", -29.1750, -51.1850);

// ============================================================================
// Centro
// ============================================================================

pub const CENTRO_SITES: &[Location] = &[
    Location::new("Praça Dante Alighieri", -29.1681, -51.1794),
    Location::new("Catedral Diocesana", -29.1688, -51.1802),
    Location::new("Rua Sinimbu x Marquês do Herval", -29.1673, -51.1823),
    Location::new("Rua Pinheiro Machado x Visconde de Pelotas", -29.1651, -51.1789),
    Location::new("Av. Júlio de Castilhos x Dr. Montaury", -29.1697, -51.1771),
    Location::new("Estação Férrea", -29.1620, -51.1722),
];

// ============================================================================
// Bairros
// ============================================================================

pub const BAIRRO_SITES: &[Location] = &[
    Location::new("São Pelegrino", -29.1720, -51.1898),
    Location::new("Exposição", -29.1608, -51.1935),
    Location::new("Lourdes", -29.1742, -51.1712),
    Location::new("Rio Branco", -29.1582, -51.1780),
    Location::new("Panazzolo", -29.1790, -51.1795),
    Location::new("Universidade de Caxias do Sul", -29.1617, -51.1505),
];

/// Returns all container sites as a single list.
pub fn all_sites() -> Vec<Location> {
    CENTRO_SITES
        .iter()
        .chain(BAIRRO_SITES.iter())
        .cloned()
        .collect()
}
