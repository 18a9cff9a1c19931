//! Tool handlers: the interval navigation algebra as JSON
//!
//! Every tool that takes an interval reads `{rank, anchor?}`. The anchor is an
//! ISO 8601 string or a field object such as `{"year": 2009, "month": 4}`;
//! without one the last completed interval of that rank is used.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use timenav::{is_valid_rank, TimeInterval, RANK_COUNT, SIZES, YEAR};
use timenav_core::{Clock, Fields, Time};
use tracing::debug;

use crate::McpError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnchorArg {
    Iso(String),
    Fields(Fields),
}

#[derive(Debug, Deserialize)]
struct IntervalArgs {
    rank: usize,
    #[serde(default)]
    anchor: Option<AnchorArg>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Next,
    Prev,
    NextJump,
    PrevJump,
    Up,
    Last,
}

#[derive(Debug, Deserialize)]
struct NavigateArgs {
    #[serde(flatten)]
    interval: IntervalArgs,
    step: Step,
}

#[derive(Debug, Deserialize)]
struct ContainsArgs {
    #[serde(flatten)]
    interval: IntervalArgs,
    time: Time,
}

pub fn tools_list() -> JsonValue {
    let interval_properties = json!({
        "rank": {
            "type": "integer",
            "minimum": 0,
            "maximum": RANK_COUNT - 1,
            "description": "Interval size: 0=year, 1=month, 2=week, 3=day, 4=hour, 5=five minutes"
        },
        "anchor": {
            "description": "Instant inside the interval: ISO 8601 string or {year, month?, day?, hour?, minute?}. Defaults to the last completed interval.",
            "oneOf": [
                { "type": "string" },
                {
                    "type": "object",
                    "properties": {
                        "year": { "type": "integer" },
                        "month": { "type": "integer" },
                        "day": { "type": "integer" },
                        "hour": { "type": "integer" },
                        "minute": { "type": "integer" }
                    },
                    "required": ["year"]
                }
            ]
        }
    });

    let with = |extra: JsonValue| {
        let mut properties = interval_properties.clone();
        if let (Some(target), Some(source)) = (properties.as_object_mut(), extra.as_object()) {
            target.extend(source.clone());
        }
        properties
    };

    json!({
        "tools": [
            {
                "name": "sizes",
                "description": "List the interval sizes, coarsest first.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "interval",
                "description": "Describe an interval: bounds, labels and which moves are available.",
                "inputSchema": {
                    "type": "object",
                    "properties": interval_properties,
                    "required": ["rank"]
                }
            },
            {
                "name": "navigate",
                "description": "Move from an interval: next/prev step by its own size, next_jump/prev_jump by the parent size, up zooms out, last returns to the latest completed interval.",
                "inputSchema": {
                    "type": "object",
                    "properties": with(json!({
                        "step": {
                            "type": "string",
                            "enum": ["next", "prev", "next_jump", "prev_jump", "up", "last"]
                        }
                    })),
                    "required": ["rank", "step"]
                }
            },
            {
                "name": "down",
                "description": "List the elapsed intervals of the next finer size inside an interval, oldest first.",
                "inputSchema": {
                    "type": "object",
                    "properties": interval_properties,
                    "required": ["rank"]
                }
            },
            {
                "name": "contains",
                "description": "Check whether an instant falls inside an interval (start inclusive, end exclusive).",
                "inputSchema": {
                    "type": "object",
                    "properties": with(json!({
                        "time": { "type": "string", "description": "ISO 8601 instant" }
                    })),
                    "required": ["rank", "time"]
                }
            }
        ]
    })
}

pub fn call(clock: &dyn Clock, name: &str, args: JsonValue) -> Result<JsonValue, McpError> {
    debug!(tool = name, "tool call");
    match name {
        "sizes" => Ok(tool_sizes()),
        "interval" => tool_interval(clock, args),
        "navigate" => tool_navigate(clock, args),
        "down" => tool_down(clock, args),
        "contains" => tool_contains(clock, args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_sizes() -> JsonValue {
    let sizes: Vec<JsonValue> = SIZES
        .iter()
        .map(|size| {
            json!({
                "rank": size.rank,
                "name": size.name(true),
                "multiplier": size.multiplier,
                "unit": size.unit,
                "format": size.format,
                "short_format": size.short_format,
            })
        })
        .collect();
    let text = SIZES
        .iter()
        .map(|size| format!("{}: {}", size.rank, size.name(false)))
        .collect::<Vec<_>>()
        .join("\n");
    json!({
        "content": [{ "type": "text", "text": text }],
        "sizes": sizes
    })
}

fn tool_interval(clock: &dyn Clock, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: IntervalArgs = parse_args(args)?;
    let interval = resolve(&args, clock)?;
    Ok(interval_result(Some(&interval), clock))
}

fn tool_navigate(clock: &dyn Clock, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: NavigateArgs = parse_args(args)?;
    let interval = resolve(&args.interval, clock)?;

    let jumps = matches!(args.step, Step::NextJump | Step::PrevJump);
    if jumps && interval.rank() == YEAR {
        return Err(McpError::invalid_params("Year intervals have no parent size to jump by"));
    }

    let target = match args.step {
        Step::Next => Some(interval.next()),
        Step::Prev => Some(interval.prev()),
        Step::NextJump => Some(interval.next_jump()),
        Step::PrevJump => Some(interval.prev_jump()),
        Step::Up => interval.up(),
        Step::Last => Some(interval.last(clock)),
    };
    Ok(interval_result(target.as_ref(), clock))
}

fn tool_down(clock: &dyn Clock, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: IntervalArgs = parse_args(args)?;
    let interval = resolve(&args, clock)?;

    let (text, choices) = match interval.down_choices(clock) {
        Some(choices) => {
            let labels: Vec<String> = choices.iter().map(|c| c.to_short_string()).collect();
            let described: Vec<JsonValue> = choices.iter().map(|c| describe(c, clock)).collect();
            (labels.join(", "), JsonValue::Array(described))
        }
        None => (format!("{} is the finest size", interval.size_name(true)), JsonValue::Null),
    };

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "parent": describe(&interval, clock),
        "choices": choices
    }))
}

fn tool_contains(clock: &dyn Clock, args: JsonValue) -> Result<JsonValue, McpError> {
    let args: ContainsArgs = parse_args(args)?;
    let interval = resolve(&args.interval, clock)?;
    let contains = interval.contains(&args.time);
    Ok(json!({
        "content": [{ "type": "text", "text": contains.to_string() }],
        "contains": contains
    }))
}

fn parse_args<T: DeserializeOwned>(args: JsonValue) -> Result<T, McpError> {
    serde_json::from_value(args)
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {}", e)))
}

/// Build the interval, rejecting ranks the library would treat as a bug
fn resolve(args: &IntervalArgs, clock: &dyn Clock) -> Result<TimeInterval, McpError> {
    if !is_valid_rank(args.rank) {
        return Err(McpError::invalid_params(format!(
            "rank {} out of range (0..{})",
            args.rank,
            RANK_COUNT - 1
        )));
    }
    let anchor = match &args.anchor {
        None => None,
        Some(AnchorArg::Iso(s)) => Some(
            Time::parse(s).map_err(|e| McpError::invalid_params(format!("Invalid anchor: {}", e)))?,
        ),
        Some(AnchorArg::Fields(fields)) => Some(
            fields
                .to_time()
                .map_err(|e| McpError::invalid_params(format!("Invalid anchor: {}", e)))?,
        ),
    };
    Ok(TimeInterval::create(args.rank, anchor, clock))
}

fn interval_result(interval: Option<&TimeInterval>, clock: &dyn Clock) -> JsonValue {
    match interval {
        Some(interval) => json!({
            "content": [{ "type": "text", "text": interval.to_string() }],
            "interval": describe(interval, clock)
        }),
        None => json!({
            "content": [{ "type": "text", "text": "No larger interval" }],
            "interval": null
        }),
    }
}

fn describe(interval: &TimeInterval, clock: &dyn Clock) -> JsonValue {
    let can_jump = interval.prev_jump_possible();
    json!({
        "rank": interval.rank(),
        "size": interval.size_name(true),
        "anchor": interval.anchor(),
        "beginning": interval.beginning(),
        "end": interval.end(),
        "label": interval.to_string(),
        "short_label": interval.to_short_string(),
        "has_been": interval.has_been(clock),
        "next_possible": interval.next_possible(clock),
        "next_jump_possible": can_jump && interval.next_jump_possible(clock),
        "prev_jump_possible": can_jump,
        "up_possible": interval.up_possible()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use timenav_core::FixedClock;

    fn clock() -> FixedClock {
        FixedClock::new(Time::from_ymd_hm(2009, 5, 1, 12, 0).unwrap())
    }

    #[test]
    fn test_tools_list_names() {
        let list = tools_list();
        let names: Vec<&str> = list["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["sizes", "interval", "navigate", "down", "contains"]);
        assert!(list["tools"][2]["inputSchema"]["properties"]["step"].is_object());
        assert!(list["tools"][2]["inputSchema"]["properties"]["rank"].is_object());
    }

    #[test]
    fn test_sizes() {
        let result = call(&clock(), "sizes", json!({})).unwrap();
        assert_eq!(result["sizes"].as_array().unwrap().len(), 6);
        assert_eq!(result["sizes"][5]["name"], "5 minutes");
        assert_eq!(result["sizes"][2]["unit"], "week");
    }

    #[test]
    fn test_interval_from_iso_anchor() {
        let result = call(&clock(), "interval", json!({"rank": 1, "anchor": "2009-04-15"})).unwrap();
        let interval = &result["interval"];
        assert_eq!(interval["label"], "2009-04");
        assert_eq!(interval["beginning"], "2009-04-01T00:00:00Z");
        assert_eq!(interval["end"], "2009-05-01T00:00:00Z");
        assert_eq!(interval["has_been"], true);
        assert_eq!(interval["next_possible"], false);
        assert_eq!(interval["up_possible"], false);
        assert_eq!(result["content"][0]["text"], "2009-04");
    }

    #[test]
    fn test_interval_from_fields_anchor() {
        let args = json!({"rank": 5, "anchor": {"year": 2020, "month": 1, "day": 1, "hour": 10, "minute": 37}});
        let result = call(&clock(), "interval", args).unwrap();
        assert_eq!(result["interval"]["short_label"], "35");
        assert_eq!(result["interval"]["label"], "2020-01-01 10:35–10:40");
    }

    #[test]
    fn test_interval_defaults_to_last_completed() {
        let result = call(&clock(), "interval", json!({"rank": 3})).unwrap();
        assert_eq!(result["interval"]["label"], "2009-04-30");
    }

    #[test]
    fn test_navigate_steps() {
        let c = clock();
        let nav = |step: &str| {
            call(&c, "navigate", json!({"rank": 3, "anchor": "2009-01-31", "step": step})).unwrap()
        };
        assert_eq!(nav("next")["interval"]["label"], "2009-02-01");
        assert_eq!(nav("prev")["interval"]["label"], "2009-01-30");
        assert_eq!(nav("next_jump")["interval"]["label"], "2009-02-07");
        assert_eq!(nav("prev_jump")["interval"]["label"], "2009-01-24");
        assert_eq!(nav("up")["interval"]["label"], "2009, week 05");
        assert_eq!(nav("last")["interval"]["label"], "2009-04-30");
    }

    #[test]
    fn test_navigate_up_from_year_is_null() {
        let result = call(&clock(), "navigate", json!({"rank": 0, "anchor": "2009-01-01", "step": "up"})).unwrap();
        assert!(result["interval"].is_null());
    }

    #[test]
    fn test_navigate_jump_from_year_rejected() {
        let err = call(&clock(), "navigate", json!({"rank": 0, "step": "next_jump"})).unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn test_down_lists_elapsed_months() {
        let result = call(&clock(), "down", json!({"rank": 0, "anchor": {"year": 2009}})).unwrap();
        assert_eq!(result["content"][0]["text"], "01, 02, 03, 04");
        assert_eq!(result["choices"].as_array().unwrap().len(), 4);
        assert_eq!(result["parent"]["label"], "2009");
    }

    #[test]
    fn test_down_at_finest_is_null() {
        let result = call(&clock(), "down", json!({"rank": 5, "anchor": "2009-04-15T10:35"})).unwrap();
        assert!(result["choices"].is_null());
    }

    #[test]
    fn test_contains_half_open() {
        let c = clock();
        let check = |time: &str| {
            call(&c, "contains", json!({"rank": 4, "anchor": "2009-04-15T10:20", "time": time})).unwrap()["contains"]
                .clone()
        };
        assert_eq!(check("2009-04-15T10:00"), true);
        assert_eq!(check("2009-04-15T10:59:59"), true);
        assert_eq!(check("2009-04-15T11:00"), false);
    }

    #[test]
    fn test_bad_arguments_rejected() {
        let c = clock();
        for args in [
            json!({"rank": 6}),
            json!({"rank": -1}),
            json!({"anchor": "2009-04-15"}),
            json!({"rank": 1, "anchor": "2009-13-01"}),
            json!({"rank": 1, "anchor": {"year": 2009, "month": 2, "day": 30}}),
        ] {
            let err = call(&c, "interval", args.clone()).unwrap_err();
            assert_eq!(err.code, -32602, "args {}", args);
        }
        assert_eq!(call(&c, "zoom", json!({})).unwrap_err().code, -32602);
    }

    #[test]
    fn test_extreme_years_rejected() {
        let c = clock();
        for args in [
            json!({"rank": 0, "anchor": {"year": 2147483647, "month": 6}}),
            json!({"rank": 1, "anchor": {"year": -2147483648}}),
            json!({"rank": 3, "anchor": "2147483647-01-01"}),
        ] {
            let err = call(&c, "interval", args.clone()).unwrap_err();
            assert_eq!(err.code, -32602, "args {}", args);
            assert!(err.message.contains("out of range"), "args {}", args);
        }
    }
}
