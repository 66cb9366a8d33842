//! The element database: a process-wide read-mostly singleton.
//!
//! Grounded on the teacher's `element.rs`, which deserializes isotope data generated at
//! build time into an `OnceLock<ElementalData>`. This engine embeds the handful of
//! elements the mass-spectrometry domain actually needs (CHNOPS plus a few others) as
//! const tables directly in source rather than introducing build-script codegen, but
//! keeps the same lazy-singleton access pattern and public API shape.

use std::sync::OnceLock;

use crate::system::f64::Mass;

/// A chemical element relevant to peptide/protein mass calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Element {
    H,
    C,
    N,
    O,
    S,
    P,
    Se,
}

/// One isotope of an element: mass number, exact mass, and natural abundance.
#[derive(Debug, Clone, Copy)]
pub struct Isotope {
    /// Mass number (protons + neutrons).
    pub mass_number: u16,
    /// Exact (monoisotopic) mass of this isotope.
    pub mass: f64,
    /// Natural abundance, in `[0, 1]`. Zero for isotopes with no natural abundance.
    pub abundance: f64,
}

struct ElementData {
    element: Element,
    isotopes: &'static [Isotope],
}

// NIST atomic weights and isotopic compositions (CODATA), monoisotopic masses in Da.
const ELEMENTS: &[ElementData] = &[
    ElementData {
        element: Element::H,
        isotopes: &[
            Isotope { mass_number: 1, mass: 1.007_825_032_07, abundance: 0.999_885 },
            Isotope { mass_number: 2, mass: 2.014_101_778_00, abundance: 0.000_115 },
        ],
    },
    ElementData {
        element: Element::C,
        isotopes: &[
            Isotope { mass_number: 12, mass: 12.0, abundance: 0.9893 },
            Isotope { mass_number: 13, mass: 13.003_354_835_07, abundance: 0.0107 },
        ],
    },
    ElementData {
        element: Element::N,
        isotopes: &[
            Isotope { mass_number: 14, mass: 14.003_074_004_32, abundance: 0.996_36 },
            Isotope { mass_number: 15, mass: 15.000_108_898_23, abundance: 0.003_64 },
        ],
    },
    ElementData {
        element: Element::O,
        isotopes: &[
            Isotope { mass_number: 16, mass: 15.994_914_619_57, abundance: 0.997_57 },
            Isotope { mass_number: 17, mass: 16.999_131_755_00, abundance: 0.000_38 },
            Isotope { mass_number: 18, mass: 17.999_159_612_86, abundance: 0.002_05 },
        ],
    },
    ElementData {
        element: Element::S,
        isotopes: &[
            Isotope { mass_number: 32, mass: 31.972_071_174_40, abundance: 0.9499 },
            Isotope { mass_number: 33, mass: 32.971_458_910_00, abundance: 0.0075 },
            Isotope { mass_number: 34, mass: 33.967_867_012_00, abundance: 0.0425 },
            Isotope { mass_number: 36, mass: 35.967_080_710_00, abundance: 0.0001 },
        ],
    },
    ElementData {
        element: Element::P,
        isotopes: &[Isotope { mass_number: 31, mass: 30.973_761_998_10, abundance: 1.0 }],
    },
    ElementData {
        element: Element::Se,
        isotopes: &[
            Isotope { mass_number: 74, mass: 73.922_476_560_00, abundance: 0.0089 },
            Isotope { mass_number: 76, mass: 75.919_213_700_00, abundance: 0.0937 },
            Isotope { mass_number: 77, mass: 76.919_914_600_00, abundance: 0.0763 },
            Isotope { mass_number: 78, mass: 77.917_309_500_00, abundance: 0.2377 },
            Isotope { mass_number: 80, mass: 79.916_521_800_00, abundance: 0.4961 },
            Isotope { mass_number: 82, mass: 81.916_699_400_00, abundance: 0.0873 },
        ],
    },
];

struct ElementalData {
    table: &'static [ElementData],
}

fn elemental_data() -> &'static ElementalData {
    static DATA: OnceLock<ElementalData> = OnceLock::new();
    DATA.get_or_init(|| ElementalData { table: ELEMENTS })
}

impl Element {
    /// All isotopes of this element, most-abundant-irrelevant order (as tabulated).
    pub fn isotopes(self) -> &'static [Isotope] {
        elemental_data()
            .table
            .iter()
            .find(|e| e.element == self)
            .map_or(&[], |e| e.isotopes)
    }

    /// The mass of the most abundant isotope (used as the monoisotopic mass).
    pub fn monoisotopic_mass(self) -> Mass {
        let isotope = self
            .isotopes()
            .iter()
            .max_by(|a, b| a.abundance.total_cmp(&b.abundance))
            .expect("every tabulated element has at least one isotope");
        Mass::new::<crate::system::mass::dalton>(isotope.mass)
    }

    /// The abundance-weighted average mass.
    pub fn average_weight(self) -> Mass {
        let isotopes = self.isotopes();
        let total: f64 = isotopes.iter().map(|i| i.mass * i.abundance).sum();
        Mass::new::<crate::system::mass::dalton>(total)
    }
}
