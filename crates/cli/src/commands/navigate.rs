//! Route guard check for a path, as the signed-in user.

use bocado_client::RouteGuard;

use super::{CommandResult, Context, print_line};

/// Resolve where navigating to `path` ends up.
///
/// # Errors
///
/// Returns an error if the session cannot be read or the route table
/// redirects in a loop.
pub fn run(ctx: &Context, path: &str) -> CommandResult {
    let sessions = ctx.sessions()?;
    let landing = RouteGuard::default().navigate(path, &sessions)?;

    for notice in &landing.notices {
        print_line(format!("! {notice}"))?;
    }
    match landing.matched {
        Some(pattern) if pattern != landing.path => {
            print_line(format!("{} (route {pattern})", landing.path))?;
        }
        _ => print_line(&landing.path)?,
    }
    for (name, value) in &landing.params {
        print_line(format!("  {name} = {value}"))?;
    }
    Ok(())
}
