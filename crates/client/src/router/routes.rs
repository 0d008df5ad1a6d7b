//! Static route table and path matching.

use std::collections::BTreeMap;

use bocado_core::Role;

/// Who may visit a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, signed in or not.
    Public,
    /// Only a signed-in user with this role.
    Role(Role),
    /// Never rendered; navigation is sent to another path.
    Redirect(&'static str),
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Pattern such as `/restaurante/:id`.
    pub pattern: &'static str,
    pub access: Access,
}

impl Route {
    const fn public(pattern: &'static str) -> Self {
        Self {
            pattern,
            access: Access::Public,
        }
    }

    const fn role(pattern: &'static str, role: Role) -> Self {
        Self {
            pattern,
            access: Access::Role(role),
        }
    }

    const fn redirect(pattern: &'static str, to: &'static str) -> Self {
        Self {
            pattern,
            access: Access::Redirect(to),
        }
    }

    /// Role required to visit this route, if any.
    #[must_use]
    pub const fn required_role(&self) -> Option<Role> {
        match self.access {
            Access::Role(role) => Some(role),
            Access::Public | Access::Redirect(_) => None,
        }
    }

    /// Match a path against this route's pattern, capturing `:name` segments.
    ///
    /// Static segments compare case-insensitively; captured values keep
    /// their original case.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut pattern = segments(self.pattern);
        let mut actual = segments(path);
        let mut params = BTreeMap::new();

        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(segment)) => {
                    if let Some(name) = expected.strip_prefix(':') {
                        params.insert(name.to_string(), segment.to_string());
                    } else if !expected.eq_ignore_ascii_case(segment) {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

/// Application routes.
pub const ROUTES: &[Route] = &[
    Route::redirect("/", "/login"),
    Route::public("/login"),
    Route::public("/register"),
    Route::public("/home"),
    // Customer
    Route::role("/home-cliente", Role::Customer),
    Route::role("/buscar-restaurantes", Role::Customer),
    Route::role("/restaurante/:id", Role::Customer),
    Route::role("/carrito", Role::Customer),
    Route::role("/mis-pedidos", Role::Customer),
    Route::role("/calificar/:orderId", Role::Customer),
    Route::role("/favoritos", Role::Customer),
    // Vendor
    Route::role("/home-vendedor", Role::Vendor),
    Route::role("/registrar-restaurante", Role::Vendor),
    Route::role("/editar-restaurante/:id", Role::Vendor),
    Route::role("/mis-productos", Role::Vendor),
    // Courier
    Route::role("/home-repartidor", Role::Courier),
];

/// Non-empty path segments, ignoring any query string or fragment.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|segment| !segment.is_empty())
}

/// First route in `routes` matching `path`, with its captured parameters.
#[must_use]
pub fn find<'r>(
    routes: &'r [Route],
    path: &str,
) -> Option<(&'r Route, BTreeMap<String, String>)> {
    routes
        .iter()
        .find_map(|route| route.matches(path).map(|params| (route, params)))
}
