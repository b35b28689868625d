use model::user::User;

/// Decides whether a free-form name refers to a roster user. The matching
/// rules belong to the host.
pub trait UserResolver {
    fn matches(&self, name: &str, user: &User) -> bool;
}

impl<F> UserResolver for F
where
    F: Fn(&str, &User) -> bool,
{
    fn matches(&self, name: &str, user: &User) -> bool {
        self(name, user)
    }
}
