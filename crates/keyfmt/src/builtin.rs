//! The built-in element set.
//!
//! Installed by [`ElementRegistry::with_builtins`]:
//!
//! | Name | Kind | Output |
//! |------|------|--------|
//! | `text` | static | its `value` attribute (alias `v`) |
//! | `value` | dynamic | the data value, optionally through `format`/`f` |
//! | `parameter` | dynamic | dot-path `name`/`n` looked up in the data, else its `value`/`v` fallback |
//! | `datetime` | dynamic | current local time, `format`/`f` is a strftime string |
//! | `ticks` | dynamic | 100-nanosecond intervals since 0001-01-01 UTC |
//! | `timestamp` | dynamic | seconds since the Unix epoch (`ms=true` for milliseconds) |
//! | `guid` | dynamic | a new random UUID (`format` one of `D`, `N`, `B`, `P`) |
//! | `machineName` | static | host name from the environment |
//! | `appDomain` | static | current executable name |
//! | `user` | static | login name from the environment |
//! | `identity` | static | `user@host` |
//! | `thread` | dynamic | numeric id of the rendering thread |
//! | `threadName` | dynamic | name of the rendering thread, empty if unnamed |
//!
//! Elements that cannot change within a process lifetime (`machineName`,
//! `appDomain`, `user`, `identity`) are resolved once into static text at
//! compile time. The time, identity, and thread elements stay dynamic and
//! are non-deterministic by nature.

use std::env;
use std::fmt::Write as _;

use chrono::{Local, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::element::Element;
use crate::error::FormatError;
use crate::registry::ElementRegistry;
use crate::resolver::ResolveContext;
use crate::value::{display, resolve_path, NumberFormat};

/// Ticks between 0001-01-01T00:00:00 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Default strftime format for the `datetime` element.
const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Installs the built-in element set into a registry.
pub(crate) fn install(registry: &mut ElementRegistry) {
    registry.register_override("text", text);
    registry.register_override("value", value);
    registry.register_override("parameter", parameter);
    registry.register_override("datetime", datetime);
    registry.register_override("ticks", ticks);
    registry.register_override("timestamp", timestamp);
    registry.register_override("guid", guid);
    registry.register_override("machineName", machine_name);
    registry.register_override("appDomain", app_domain);
    registry.register_override("user", user);
    registry.register_override("identity", identity);
    registry.register_override("thread", thread);
    registry.register_override("threadName", thread_name);
}

fn text(ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::static_text(ctx.attrs().get_or(&["value", "v"], "")))
}

fn value(ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    let format = number_format(ctx)?;
    Ok(Element::dynamic(move |data: &Value| {
        Ok(match format {
            Some(format) => format.apply(data),
            None => display(data),
        })
    }))
}

fn parameter(ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    let name = ctx.attrs().required(ctx.name(), &["name", "n"])?.to_string();
    let format = number_format(ctx)?;
    // The fallback value may itself embed element references; compiling it
    // here surfaces its configuration errors at the same time as ours.
    let fallback = match ctx.attrs().get_any(&["value", "v"]) {
        Some(value) => Some(ctx.compile_nested(value)?),
        None => None,
    };

    Ok(Element::dynamic(move |data: &Value| {
        match resolve_path(data, &name) {
            Some(found) => Ok(match format {
                Some(format) => format.apply(found),
                None => display(found),
            }),
            None => match &fallback {
                Some(template) => template.render_value(data),
                None => Ok(String::new()),
            },
        }
    }))
}

fn datetime(ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    let format = ctx
        .attrs()
        .get_or(&["format", "f"], DEFAULT_DATETIME_FORMAT)
        .to_string();

    // Probe once so an unknown specifier fails at compile time.
    let mut probe = String::new();
    if write!(probe, "{}", Local::now().format(&format)).is_err() {
        return Err(FormatError::InvalidAttribute {
            element: ctx.name().to_string(),
            attribute: "format".to_string(),
            value: format,
        });
    }

    Ok(Element::dynamic(move |_: &Value| {
        let mut out = String::new();
        write!(out, "{}", Local::now().format(&format))
            .map_err(|_| FormatError::Render(format!("invalid datetime format \"{format}\"")))?;
        Ok(out)
    }))
}

fn ticks(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::dynamic(|_: &Value| {
        let now = Utc::now();
        let ticks = now.timestamp() * 10_000_000
            + i64::from(now.timestamp_subsec_nanos() / 100)
            + UNIX_EPOCH_TICKS;
        Ok(ticks.to_string())
    }))
}

fn timestamp(ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    let millis = ctx
        .attrs()
        .convert(ctx.name(), &["ms"], parse_bool)?
        .unwrap_or(false);

    Ok(Element::dynamic(move |_: &Value| {
        let now = Utc::now();
        Ok(if millis {
            now.timestamp_millis().to_string()
        } else {
            now.timestamp().to_string()
        })
    }))
}

#[derive(Clone, Copy)]
enum GuidFormat {
    Hyphenated,
    Simple,
    Braced,
    Parenthesized,
}

fn guid(ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    let format = ctx
        .attrs()
        .convert(ctx.name(), &["format", "f"], |value| match value {
            "D" => Some(GuidFormat::Hyphenated),
            "N" => Some(GuidFormat::Simple),
            "B" => Some(GuidFormat::Braced),
            "P" => Some(GuidFormat::Parenthesized),
            _ => None,
        })?
        .unwrap_or(GuidFormat::Hyphenated);

    Ok(Element::dynamic(move |_: &Value| {
        let id = Uuid::new_v4();
        Ok(match format {
            GuidFormat::Hyphenated => id.as_hyphenated().to_string(),
            GuidFormat::Simple => id.as_simple().to_string(),
            GuidFormat::Braced => id.as_braced().to_string(),
            GuidFormat::Parenthesized => format!("({})", id.as_hyphenated()),
        })
    }))
}

fn machine_name(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::static_text(host_name()))
}

fn app_domain(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::static_text(executable_name()))
}

fn user(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::static_text(user_name()))
}

fn identity(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::static_text(format!("{}@{}", user_name(), host_name())))
}

fn thread(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::dynamic(|_: &Value| Ok(thread_id_digits())))
}

fn thread_name(_ctx: &ResolveContext<'_>) -> Result<Element, FormatError> {
    Ok(Element::dynamic(|_: &Value| {
        Ok(std::thread::current().name().unwrap_or_default().to_string())
    }))
}

fn number_format(ctx: &ResolveContext<'_>) -> Result<Option<NumberFormat>, FormatError> {
    ctx.attrs()
        .convert(ctx.name(), &["format", "f"], NumberFormat::parse)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn host_name() -> String {
    env::var("HOSTNAME")
        .or_else(|_| env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}

fn user_name() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn executable_name() -> String {
    env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn thread_id_digits() -> String {
    // ThreadId's numeric value is only reachable through its Debug output.
    let id = format!("{:?}", std::thread::current().id());
    id.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}
