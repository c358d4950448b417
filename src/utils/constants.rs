/// Upstream endpoints, relative to the configured base URL
pub const DIRECTORY_PATH: &str = "/grafest/jpGraph/graficas/scriptEstaciones_prueba.php";
pub const STATION_PAGE_PATH: &str = "/grafest/jpGraph/graficas/datos.php";
pub const FAILOVER_PATH: &str = "/grafest/jpGraph/graficas/jsongraf.php";
pub const REPORT_SOURCE_URL: &str = "http://senamhi.gob.bo/index.php/tiempo_real";

/// Fetch defaults
pub const DEFAULT_BASE_URL: &str = "http://200.105.169.186";
pub const DEFAULT_RETRY_MAX: u32 = 2;
pub const DEFAULT_SLEEP_SECS: u64 = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_DIRECTORY_TIMEOUT_FACTOR: u32 = 3;
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -4;
pub const USER_AGENT: &str = concat!("meteo-bolivia/", env!("CARGO_PKG_VERSION"));

/// File names
pub const SNAPSHOT_FILE: &str = "./hoy.csv";
pub const STATUS_FILE: &str = "./status.csv";
pub const REPORT_FILE: &str = "./README.md";
pub const ARCHIVE_DIR: &str = "./data";
pub const SETTINGS_FILE: &str = "meteo";
pub const SETTINGS_ENV_PREFIX: &str = "METEO";

/// Column names of the snapshot file, in reading order
pub const COL_TIMESTAMP: &str = "fecha";
pub const COL_STATION: &str = "estacion";
pub const COL_WIND_DIRECTION: &str = "viento_direccion";
pub const COL_WIND_SPEED: &str = "viento_velocidad";
pub const COL_TEMPERATURE: &str = "temperatura";
pub const COL_DEW_POINT: &str = "temperatura_de_rocio";
pub const COL_HUMIDITY: &str = "humedad_relativa";
pub const COL_PRESSURE: &str = "presion_atmosferica";
pub const COL_PRECIPITATION: &str = "precipitacion";
pub const COL_LAST_UPDATE: &str = "fecha_ultima_actualizacion";

pub const READING_COLUMNS: [&str; 9] = [
    COL_TIMESTAMP,
    COL_STATION,
    COL_WIND_DIRECTION,
    COL_WIND_SPEED,
    COL_TEMPERATURE,
    COL_DEW_POINT,
    COL_HUMIDITY,
    COL_PRESSURE,
    COL_PRECIPITATION,
];

/// Per-station value columns of a monthly archive row
pub const ARCHIVE_FIELDS: [&str; 7] = [
    COL_WIND_DIRECTION,
    COL_WIND_SPEED,
    COL_TEMPERATURE,
    COL_DEW_POINT,
    COL_HUMIDITY,
    COL_PRESSURE,
    COL_PRECIPITATION,
];

/// Units legend published in the report, aligned with `READING_COLUMNS`
pub const READING_UNITS: [&str; 9] = [
    "GMT -4",
    "",
    "",
    "Nudos",
    "Grados Centigrados",
    "Grados Centigrados",
    "Porcentaje",
    "Milibar",
    "mm/hora",
];

/// Failover series names mapped onto snapshot columns
pub const FAILOVER_SERIES: [(&str, &str); 5] = [
    ("Velocidad", COL_WIND_SPEED),
    ("Temperatura", COL_TEMPERATURE),
    ("Humedad Relativa", COL_HUMIDITY),
    ("Presión", COL_PRESSURE),
    ("Precipitación", COL_PRECIPITATION),
];

/// Marker the station pages use for "no data"
pub const NO_DATA_MARKER: &str = "*";

/// Added to wind speed before vector averaging so a calm reading keeps its direction
pub const WIND_EPSILON: f64 = 1e-3;

/// Decimal places kept in the monthly archive
pub const ARCHIVE_DECIMALS: i32 = 1;

/// Timestamp layout of snapshot, status and archive files
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
