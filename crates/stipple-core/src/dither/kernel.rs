//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how quantization error is distributed to
//! neighboring pixels that have not been visited yet.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; a neighbor receives
/// `error * weight / divisor`. `dx` is mirrored on serpentine reverse rows,
/// `dy` is always zero or positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error this kernel propagates (1.0 = all of it).
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| u32::from(w)).sum();
        total as f32 / f32::from(self.divisor)
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // forward
        (-1, 1, 3), // trailing diagonal
        (0, 1, 5),  // below
        (1, 1, 1),  // leading diagonal
    ],
    divisor: 16,
};

/// Atkinson dithering kernel.
///
/// Distributes error to 6 neighbors with 75% total propagation (6/8).
/// The lost quarter keeps highlights and shadows crisp.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
};

/// Sierra Lite dithering kernel.
///
/// ```text
///    X   2
///    1   1
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
};

/// Jarvis-Judice-Ninke dithering kernel.
///
/// Distributes error to 12 neighbors over 3 rows with 100% propagation (48/48).
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
};
