// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use anyhow::Result;
use structopt::StructOpt;
use tracing_subscriber::{
    fmt::{format::DefaultFields, FormattedFields},
    prelude::*,
    registry::Registry,
};

// Inspired heavily by bevy_log

#[derive(Clone, Debug, StructOpt)]
pub struct TraceLogOpts {
    /// Capture a chrome-format execution trace.
    #[structopt(short = "T", long)]
    trace: bool,
}

/// Guard returned by [`init`]; dropping it flushes the chrome trace file, if any.
pub struct TraceLogGuard {
    _chrome_guard: Option<tracing_chrome::FlushGuard>,
}

/// Install the global tracing subscriber for one tiling run.
///
/// The tiling core never calls back into a caller-supplied progress hook;
/// it only emits `tracing` spans and events on its hot path, so any caller
/// can subscribe however it likes (plain fmt, chrome trace, or nothing).
pub fn init(opts: &TraceLogOpts) -> Result<TraceLogGuard> {
    let subscriber = Registry::default();
    let subscriber = subscriber.with(tracing_error::ErrorLayer::default());
    let fmt_layer = tracing_subscriber::fmt::Layer::default();
    let subscriber = subscriber.with(fmt_layer);

    let chrome_guard = if opts.trace {
        let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
            .name_fn(Box::new(|event_or_span| match event_or_span {
                tracing_chrome::EventOrSpan::Event(event) => event.metadata().name().into(),
                tracing_chrome::EventOrSpan::Span(span) => {
                    if let Some(fields) = span.extensions().get::<FormattedFields<DefaultFields>>()
                    {
                        format!("{}: {}", span.metadata().name(), fields.fields.as_str())
                    } else {
                        span.metadata().name().into()
                    }
                }
            }))
            .build();
        let subscriber = subscriber.with(chrome_layer);
        tracing::subscriber::set_global_default(subscriber)?;
        Some(guard)
    } else {
        tracing::subscriber::set_global_default(subscriber)?;
        None
    };

    Ok(TraceLogGuard {
        _chrome_guard: chrome_guard,
    })
}
