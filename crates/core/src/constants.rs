//! Constants used throughout the Labora core crate.

use std::time::Duration;

/// Backend base URL used when `LABORA_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Quiet period before the filter engine recomputes.
pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Per-request timeout used when `LABORA_REQUEST_TIMEOUT_SECS` is not set.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Label of the category selector option that disables category filtering.
pub const ALL_CATEGORIES_LABEL: &str = "Semua";

/// Joined category label shown for a material without diet tags.
pub const UNCATEGORISED_LABEL: &str = "Diet";

/// Image shown on a card when the material has no stored image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// Display name used when the signed-in user has no name.
pub const FALLBACK_USER_NAME: &str = "Pengguna";

/// Role assigned to every account created or signed in through this client.
pub const RESEARCHER_ROLE: &str = "researcher";

/// Largest image accepted for upload (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Material groups offered by the add/edit forms.
pub const MATERIAL_GROUPS: [&str; 12] = [
    "Pangan Fungsional & Fortifikasi",
    "Minuman & Ekstrak",
    "Produk Olahan",
    "Bahan Tambahan Pangan (Additive)",
    "Rempah & Bumbu",
    "Minyak & Lemak",
    "Produk Hewani",
    "Sayuran",
    "Buah-buahan",
    "Umbi-umbian",
    "Kacang-Kacangan & Legum",
    "Biji-bijian & Serealia",
];
