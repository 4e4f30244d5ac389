//! Endpoint catalog.
//!
//! A static table mapping each tool name to its endpoint, the parameters it
//! requires or defaults, and how those parameters land on the query string.
//! Adding a capability means adding one row to [`CATALOG`].

/// Remote service a capability talks to.
///
/// The base URL and any credential come from [`Settings`](crate::utilities::config::Settings),
/// so every capability on the same service shares them read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// open-notify.org: astronauts and ISS position. No key.
    OpenNotify,
    /// weatherapi.com: the weather family. Keyed.
    WeatherApi,
}

impl Service {
    /// Query parameter name the service expects its credential under.
    pub fn credential_param(&self) -> Option<&'static str> {
        match self {
            Service::OpenNotify => None,
            Service::WeatherApi => Some("key"),
        }
    }

    /// Environment variable holding the credential.
    pub fn credential_env(&self) -> Option<&'static str> {
        match self {
            Service::OpenNotify => None,
            Service::WeatherApi => Some("WEATHER_API_KEY"),
        }
    }
}

/// Path of a capability relative to its service's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub service: Service,
    pub path: &'static str,
}

/// How a parameter value is interpreted during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Latitude or longitude, as a numeric string or a number.
    Coordinate,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// Small positive integer.
    Count,
}

impl ParamKind {
    /// JSON Schema type advertised for this kind.
    pub fn schema_type(&self) -> &'static str {
        match self {
            ParamKind::Coordinate | ParamKind::Date => "string",
            ParamKind::Count => "integer",
        }
    }
}

/// A declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
}

/// Default injected for an absent optional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Count(u64),
    Text(&'static str),
}

/// An optional parameter together with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalParam {
    pub spec: ParamSpec,
    pub default: ParamDefault,
}

/// Maps normalized parameters onto query-string pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBinding {
    /// `key=<latitude>,<longitude>`.
    Coordinates { key: &'static str },
    /// `key=<value of param>`, skipped when the parameter is absent.
    Param {
        key: &'static str,
        param: &'static str,
    },
}

/// Immutable descriptor of one named fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// Unique tool name the agent selects by.
    pub name: &'static str,
    /// Tells the agent what the tool does.
    pub description: &'static str,
    /// What is being fetched, for failure messages ("Failed to fetch <resource> ...").
    pub resource: &'static str,
    pub endpoint: Endpoint,
    pub required: &'static [ParamSpec],
    pub optional: &'static [OptionalParam],
    pub query: &'static [QueryBinding],
}

impl Capability {
    /// All declared parameter specs, required first.
    pub fn params(&self) -> impl Iterator<Item = &ParamSpec> + '_ {
        self.required
            .iter()
            .chain(self.optional.iter().map(|opt| &opt.spec))
    }

    /// Look up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params().find(|spec| spec.name == name)
    }
}

const LATITUDE: ParamSpec = ParamSpec {
    name: "latitude",
    kind: ParamKind::Coordinate,
    description: "Latitude in decimal degrees, e.g. \"23.5\"",
};

const LONGITUDE: ParamSpec = ParamSpec {
    name: "longitude",
    kind: ParamKind::Coordinate,
    description: "Longitude in decimal degrees, e.g. \"-45.3\"",
};

const DATE: ParamSpec = ParamSpec {
    name: "date",
    kind: ParamKind::Date,
    description: "Date as YYYY-MM-DD",
};

const DAYS: ParamSpec = ParamSpec {
    name: "days",
    kind: ParamKind::Count,
    description: "Number of forecast days",
};

const COORDINATES: &[ParamSpec] = &[LATITUDE, LONGITUDE];
const COORDINATES_AND_DATE: &[ParamSpec] = &[LATITUDE, LONGITUDE, DATE];

const Q: QueryBinding = QueryBinding::Coordinates { key: "q" };
const DT: QueryBinding = QueryBinding::Param {
    key: "dt",
    param: "date",
};

/// Every capability exposed to the agent, in registration order.
pub static CATALOG: &[Capability] = &[
    Capability {
        name: "get_astros_tool",
        description: "Fetches the current humans in space and the spacecraft they are on.",
        resource: "Astros",
        endpoint: Endpoint {
            service: Service::OpenNotify,
            path: "astros.json",
        },
        required: &[],
        optional: &[],
        query: &[],
    },
    Capability {
        name: "get_iss_location_tool",
        description: "Fetches the International Space Station's current location.",
        resource: "ISS location",
        endpoint: Endpoint {
            service: Service::OpenNotify,
            path: "iss-now.json",
        },
        required: &[],
        optional: &[],
        query: &[],
    },
    Capability {
        name: "fetch_weather",
        description: "Fetches the current weather and geographic information at a given latitude and longitude.",
        resource: "weather",
        endpoint: Endpoint {
            service: Service::WeatherApi,
            path: "current.json",
        },
        required: COORDINATES,
        optional: &[],
        query: &[Q],
    },
    Capability {
        name: "fetch_forecast",
        description: "Fetches the weather forecast for the next few days (default 3) at a given latitude and longitude.",
        resource: "forecast",
        endpoint: Endpoint {
            service: Service::WeatherApi,
            path: "forecast.json",
        },
        required: COORDINATES,
        optional: &[OptionalParam {
            spec: DAYS,
            default: ParamDefault::Count(3),
        }],
        query: &[
            Q,
            QueryBinding::Param {
                key: "days",
                param: "days",
            },
        ],
    },
    Capability {
        name: "fetch_history",
        description: "Fetches the historical weather on a given date (YYYY-MM-DD) at a given latitude and longitude.",
        resource: "weather history",
        endpoint: Endpoint {
            service: Service::WeatherApi,
            path: "history.json",
        },
        required: COORDINATES_AND_DATE,
        optional: &[],
        query: &[Q, DT],
    },
    Capability {
        name: "fetch_marine",
        description: "Fetches the marine and sailing weather (tides, swell, water temperature) at a given latitude and longitude.",
        resource: "marine weather",
        endpoint: Endpoint {
            service: Service::WeatherApi,
            path: "marine.json",
        },
        required: COORDINATES,
        optional: &[],
        query: &[Q],
    },
    Capability {
        name: "fetch_timezone",
        description: "Fetches the time zone and local time at a given latitude and longitude.",
        resource: "timezone",
        endpoint: Endpoint {
            service: Service::WeatherApi,
            path: "timezone.json",
        },
        required: COORDINATES,
        optional: &[],
        query: &[Q],
    },
    Capability {
        name: "fetch_astronomy",
        description: "Fetches sunrise, sunset, moonrise, moonset and moon phase on a given date (YYYY-MM-DD) at a given latitude and longitude.",
        resource: "astronomy data",
        endpoint: Endpoint {
            service: Service::WeatherApi,
            path: "astronomy.json",
        },
        required: COORDINATES_AND_DATE,
        optional: &[],
        query: &[Q, DT],
    },
];

/// Exact-match lookup by tool name.
pub fn lookup(name: &str) -> Option<&'static Capability> {
    CATALOG.iter().find(|cap| cap.name == name)
}
