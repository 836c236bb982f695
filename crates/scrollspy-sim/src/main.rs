//! scrollspy-sim - replay a scroll script against an observer
//!
//! Usage: scrollspy-sim <element-top> [delay-ms] [<at-ms>:<scroll-top>...]
//!
//! Builds an 800x600 page with one 50px tall element, attaches an observer
//! and scrolls the document at the given times. Zone changes are logged;
//! set RUST_LOG=scrollspy=trace to see every pass.

use anyhow::{Context, Result, bail};
use scrollspy::{Observer, ObserverOptions, Zone};
use scrollspy_host::{DOMRect, Viewport, Window};
use tracing_subscriber::EnvFilter;

/// One scripted scroll
#[derive(Debug, Clone, Copy, PartialEq)]
struct Step {
    at_ms: u64,
    scroll_top: f64,
}

fn parse_step(arg: &str) -> Result<Step> {
    let (at, top) = arg
        .split_once(':')
        .with_context(|| format!("step '{}' is not <at-ms>:<scroll-top>", arg))?;
    Ok(Step {
        at_ms: at.parse().with_context(|| format!("bad time in step '{}'", arg))?,
        scroll_top: top.parse().with_context(|| format!("bad scroll offset in step '{}'", arg))?,
    })
}

fn default_script(element_top: f64) -> Vec<Step> {
    vec![
        Step { at_ms: 0, scroll_top: 0.0 },
        Step { at_ms: 200, scroll_top: element_top },
        Step { at_ms: 220, scroll_top: element_top },
        Step { at_ms: 500, scroll_top: element_top + 150.0 },
        Step { at_ms: 900, scroll_top: 0.0 },
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let element_top: f64 = args
        .next()
        .context("usage: scrollspy-sim <element-top> [delay-ms] [<at-ms>:<scroll-top>...]")?
        .parse()
        .context("element top must be a number")?;
    let delay_ms = match args.next() {
        Some(arg) => scrollspy::bindings::delay_from_millis(arg.parse().context("delay must be a number")?)?,
        None => scrollspy::DEFAULT_DELAY_MS,
    };
    let mut script = args.map(|a| parse_step(&a)).collect::<Result<Vec<_>>>()?;
    if script.is_empty() {
        script = default_script(element_top);
    }
    if script.windows(2).any(|w| w[1].at_ms < w[0].at_ms) {
        bail!("steps must be in time order");
    }

    let window = Window::new(Viewport::new(800.0, 600.0));
    let element = window
        .document_mut()
        .create_element("nav", DOMRect::from_xywh(0.0, element_top, 800.0, 50.0));
    let observer = Observer::new(&window, element, ObserverOptions::default().with_delay(delay_ms))?;

    for zone in Zone::ALL {
        observer.add_action(zone, move |el| {
            tracing::info!("t={}ms {} {}", el.window().now(), el.node(), zone);
            Ok(())
        });
    }
    observer
        .when_below(|el| Ok(el.toggle_class("is-sticky", true)?))
        .when_above(|el| Ok(el.toggle_class("is-sticky", false)?));

    tracing::info!(
        "Observing element at {}px (delay {}ms), initial zone {:?}",
        element_top,
        delay_ms,
        observer.zone()
    );

    for step in &script {
        window.advance(step.at_ms.saturating_sub(window.now()));
        tracing::debug!("t={}ms scroll to {}", window.now(), step.scroll_top);
        window.scroll_to(step.scroll_top);
    }
    window.run_until_idle();

    let stats = observer.stats();
    tracing::info!(
        "Done at t={}ms: zone {:?}, sticky {}, {} passes, {} actions ({} failed)",
        window.now(),
        observer.zone(),
        observer.element().has_class("is-sticky"),
        stats.passes,
        stats.dispatched,
        stats.failures
    );
    observer.dispose();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_step() {
        assert_eq!(parse_step("120:350.5").unwrap(), Step { at_ms: 120, scroll_top: 350.5 });
        assert!(parse_step("120").is_err());
        assert!(parse_step("soon:10").is_err());
    }

    #[test]
    fn test_default_script_is_ordered() {
        let script = default_script(200.0);
        assert!(script.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
    }
}
