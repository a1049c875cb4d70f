//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API defaults
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const LOGIN_PATH: &str = "/auth/login";

// Backend resources
pub const INVENTORY_PATH: &str = "/elementos";
pub const USERS_PATH: &str = "/users";
pub const STORES_PATH: &str = "/tiendas";
pub const MOVEMENTS_PATH: &str = "/movimientos";
pub const DASHBOARD_STATS_PATH: &str = "/dashboard/stats";
pub const NOTIFY_ASSIGNMENT_PATH: &str = "/asignacion/notificar-asignacion";
pub const CONFIRM_ASSIGNMENT_PATH: &str = "/asignacion/confirmar-asignacion";
pub const REACTIVATE_ASSIGNMENT_PATH: &str = "/asignacion/reactivar-asignacion";
pub const ACTAS_PUBLIC_PATH: &str = "/public/actas";

// Pagination discovery
pub const DEFAULT_LARGE_LIMIT: usize = 5000;
pub const DEFAULT_MAX_PAGE_REQUESTS: usize = 25;
/// Page sizes that suggest a backend truncated its answer when no total or
/// limit is declared.
pub const COMMON_PAGE_SIZES: &[usize] = &[10, 15, 20, 25, 30, 50, 100, 200, 250, 500, 1000];

// Session
pub const SESSION_STORAGE_KEY: &str = "actasti_auth_session";
pub const DEFAULT_SESSION_HOURS: u64 = 8;

// Input limits
pub const MAX_CONFIRMATION_TOKEN_LENGTH: usize = 2048;
pub const MIN_LOOKUP_VALUE_LENGTH: usize = 3;

// User-facing messages
pub const USER_NOT_FOUND_MESSAGE: &str = "Usuario no encontrado";
pub const ACTA_NOT_FOUND_MESSAGE: &str = "No se pudo descargar el acta desde ninguna ruta conocida";
