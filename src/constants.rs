//! Field schemas, literal tokens and format strings for every log grammar.
//!
//! Column names are part of the output contract: downstream merge, plot and
//! KML tools look columns up by these exact names.

// =============================================================================
// Timestamps
// =============================================================================

/// Format of the bracketed timestamp prefix shared by line-oriented logs
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Human-readable label for [`LINE_TIMESTAMP_FORMAT`] used in error messages
pub const LINE_TIMESTAMP_LABEL: &str = "YYYY-MM-DD HH:MM:SS.ffffff";

/// Rendering used for every timestamp written to a `time`-like column
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Time-of-day format of the Nemo `Time` column
pub const NEMO_TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Externally supplied Nemo log date
pub const NEMO_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Field schemas (time column first where the grammar carries one)
// =============================================================================

pub mod schemas {
    pub const UE: &[&str] = &[
        "time", "cc", "pci", "rsrp", "pl", "cfo", "mcsDl", "snr", "turbo", "brateDl", "blerDl",
        "ta_us", "mcsUl", "buff", "brateUl", "blerUl",
    ];

    pub const ENB: &[&str] = &[
        "time", "rnti", "cqi", "ri", "mcsDl", "brateDl", "okDl", "nokDl", "(%)Dl", "snr", "phr",
        "mcsUl", "brateUl", "okUl", "nokUl", "(%)Ul", "bsr",
    ];

    pub const FREE_TEXT: &[&str] = &["time", "log"];

    pub const PING: &[&str] = &[
        "time",
        "size(byte)",
        "destination",
        "icmp_seq",
        "ttl",
        "pingtime",
    ];

    pub const IPERF_SERVER: &[&str] = &[
        "time",
        "ID",
        "Interval(sec)",
        "Transfer(MBytes)",
        "Bandwidth(MBits/sec)",
    ];

    pub const IPERF_CLIENT: &[&str] = &[
        "time",
        "ID",
        "Interval(sec)",
        "Transfer(MBytes)",
        "Bandwidth(MBits/sec)",
        "Retr",
        "Cwnd(KBytes)",
    ];

    pub const MGEN: &[&str] = &[
        "time",
        "Interval(sec)",
        "Latency(sec)",
        "Bandwidth(MBits/sec)",
    ];

    pub const CELL_SEARCH: &[&str] = &[
        "time", "Freq", "EARFCN", "PHYID", "PRB", "Ports", "PSS", "PSR",
    ];

    /// Shared by the predetermined-trajectory and GPS logger outputs
    pub const VEHICLE_OUT: &[&str] = &[
        "num",
        "Longitude",
        "Latitude",
        "Altitude",
        "Pitch",
        "Yaw",
        "Roll",
        "VelocityX",
        "VelocityY",
        "VelocityZ",
        "BatteryVolts",
        "time",
        "GPSFix",
        "NumberOfSatellites",
    ];

    pub const CHANNEL_SOUNDER: &[&str] = &["time", "Measurement No", "Power in dB"];

    pub const GNURADIO_OFDM: &[&str] = &["time", "Offset", "Source", "Key", "Value"];
}

// =============================================================================
// Literal tokens
// =============================================================================

/// Throughput unit labels emitted by iperf, with how many times each may be stripped
pub const IPERF_UNIT_TOKENS: &[(&str, usize)] = &[
    ("sec", 1),
    ("Mbits/sec", 1),
    ("Kbits/sec", 1),
    ("bits/sec", 1),
    ("MBytes", 2),
    ("KBytes", 2),
    ("Bytes", 2),
];

pub const PING_FRAMING_TOKENS: &[(&str, usize)] = &[("bytes", 1), ("from", 1), ("ms", 1)];

pub const GNURADIO_LABEL_TOKENS: &[(&str, usize)] = &[
    ("Offset:", 1),
    ("Source:", 1),
    ("Key:", 1),
    ("Value:", 1),
];

/// Lines announcing that the next tagged line carries OFDM values
pub const GNURADIO_MARKERS: &[&str] = &["Tag Debug: Rx Bytes with SNR", "Input Stream:"];

/// Number of markers that must be seen before a data line is accepted
pub const GNURADIO_MARKERS_BEFORE_DATA: usize = 2;

/// Label preceding each value in a cell search line, in schema order
pub const CELL_SEARCH_LABELS: &[&str] = &[
    "Found CELL MHz",
    "EARFCN",
    "PHYID",
    "PRB",
    "ports",
    "PSS power dB",
    "PSR",
];

// =============================================================================
// PawPrints (phone diagnostics)
// =============================================================================

pub mod pawprints {
    pub const CELLS: &str = "cells";
    pub const ABS_TIME: &str = "abs_time";
    pub const CONNECTED_PCI: &str = "connected_pci";
    pub const COMPANION_ABS_TIME: &str = "companion_abs_time";
    pub const NR_SIGNAL_STRENGTH: &str = "nr_signal_strength";
    pub const PCI: &str = "pci";

    pub const PHONE_ABS_TIME: &str = "phone_abs_time";
    pub const PHONE_TIME_READABLE: &str = "phone_time_readable";
    pub const COMPANION_TIME_READABLE: &str = "companion_time_readable";
    pub const IS_CONNECTED: &str = "is_connected";
}

// =============================================================================
// Nemo drive-test exports
// =============================================================================

pub mod nemo {
    pub const TIME: &str = "Time";
    pub const LTE_CELL_ID: &str = "Physical layer identity (LTE detected)";
    pub const NR_CELL_ID: &str = "Physical cell identity (NR SpCell)";
    pub const ABS_TIME: &str = "nemo_abs_time";
    pub const LIST_SEPARATOR: char = ',';
}

/// Extension given to exported files
pub const CSV_EXTENSION: &str = "csv";
