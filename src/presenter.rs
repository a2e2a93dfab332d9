// Plain HTML rendering of a snapshot. Every section renders, whatever its source state.

use crate::models::{Container, ManagedProcess, SourceResult, StatusSnapshot, SystemMetrics};
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}table{border-collapse:collapse}\
td,th{border:1px solid #ccc;padding:.25rem .5rem;text-align:left}\
.unavailable{color:#666}.error{color:#b00}";

pub fn render_html(snapshot: &StatusSnapshot) -> Result<String, std::fmt::Error> {
    let mut out = String::with_capacity(4096);
    write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Ops Dashboard</title>\
         <style>{STYLE}</style></head><body><h1>Ops Dashboard</h1>"
    )?;
    let taken = chrono::DateTime::from_timestamp_millis(snapshot.timestamp as i64)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();
    write!(out, "<p>Snapshot taken {}</p>", escape(&taken))?;

    section(&mut out, "System", &snapshot.metrics, render_metrics)?;
    section(&mut out, "Processes", &snapshot.processes, |out, p| {
        render_processes(out, p)
    })?;
    section(&mut out, "Containers", &snapshot.containers, |out, c| {
        render_containers(out, c)
    })?;

    out.push_str("</body></html>");
    Ok(out)
}

fn section<T>(
    out: &mut String,
    title: &str,
    result: &SourceResult<T>,
    render: impl FnOnce(&mut String, &T) -> std::fmt::Result,
) -> std::fmt::Result {
    write!(out, "<section><h2>{}</h2>", escape(title))?;
    match result {
        SourceResult::Ok(v) => render(out, v)?,
        SourceResult::Unavailable(reason) => write!(
            out,
            "<p class=\"unavailable\">Not available: {}</p>",
            escape(reason)
        )?,
        SourceResult::Error(message) => {
            write!(out, "<p class=\"error\">Error: {}</p>", escape(message))?
        }
    }
    out.push_str("</section>");
    Ok(())
}

fn render_metrics(out: &mut String, m: &SystemMetrics) -> std::fmt::Result {
    write!(
        out,
        "<table><tr><th>Uptime</th><td>{:.1} s</td></tr>\
         <tr><th>Load (1m)</th><td>{:.2}</td></tr>\
         <tr><th>Memory</th><td>{} free / {} total</td></tr>\
         <tr><th>CPU</th><td>{:.1}%</td></tr></table>",
        m.uptime_seconds,
        m.load_average_1m,
        format_bytes(m.free_memory_bytes),
        format_bytes(m.total_memory_bytes),
        m.cpu_usage_fraction * 100.0
    )
}

fn render_processes(out: &mut String, procs: &[ManagedProcess]) -> std::fmt::Result {
    if procs.is_empty() {
        out.push_str("<p>No managed processes.</p>");
        return Ok(());
    }
    out.push_str("<table><tr><th>Name</th><th>Status</th><th>CPU</th><th>Memory</th></tr>");
    for p in procs {
        write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td></tr>",
            escape(&p.name),
            p.status.as_str(),
            p.cpu_percent,
            format_bytes(p.memory_bytes)
        )?;
    }
    out.push_str("</table>");
    Ok(())
}

fn render_containers(out: &mut String, containers: &[Container]) -> std::fmt::Result {
    if containers.is_empty() {
        out.push_str("<p>No containers.</p>");
        return Ok(());
    }
    out.push_str("<table><tr><th>Name</th><th>Image</th><th>Status</th><th>Ports</th></tr>");
    for c in containers {
        let ports = c
            .ports
            .iter()
            .map(|p| {
                if p.host_port.is_empty() {
                    p.host_address.clone()
                } else {
                    format!("{}:{}", p.host_address, p.host_port)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&c.name),
            escape(&c.image),
            escape(&c.status),
            escape(&ports)
        )?;
    }
    out.push_str("</table>");
    Ok(())
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
