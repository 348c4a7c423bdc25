use crate::models::{GenderIdentity, Member, Orientation};

/// Whether someone with `orientation` is open to a partner with `identity`
///
/// NonBinary members are acceptable under every orientation.
#[inline]
pub fn accepts(orientation: Orientation, identity: GenderIdentity) -> bool {
    match orientation {
        Orientation::Bisexual => true,
        Orientation::PrefersMen => {
            matches!(identity, GenderIdentity::Male | GenderIdentity::NonBinary)
        }
        Orientation::PrefersWomen => {
            matches!(identity, GenderIdentity::Female | GenderIdentity::NonBinary)
        }
    }
}

/// Check if two members may be paired at all
///
/// Both directions must hold: `a` must accept `b`'s identity and `b` must
/// accept `a`'s. Pairs failing this check never enter a preference list, so
/// they are also outside the stability guarantee of the pairing round.
#[inline]
pub fn compatible(a: &Member, b: &Member) -> bool {
    accepts(a.orientation, b.gender_identity) && accepts(b.orientation, a.gender_identity)
}
