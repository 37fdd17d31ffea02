//! Static-member placement check

use tracing::debug;

use crate::error::{MetadataError, Result};
use crate::site::Site;

/// Reject `site` if it is a static member
///
/// Runs before anything is written, so a rejected application leaves no
/// partial record behind.
pub fn assert_instance_member(site: &Site) -> Result<()> {
    if site.is_static() {
        let slot = site.property_key().to_string();
        debug!(%site, "rejected annotation on static member");
        return Err(MetadataError::StaticMember { slot });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_table::ClassId;

    #[test]
    fn test_instance_members_pass() {
        let class = ClassId(0);
        assert!(assert_instance_member(&Site::property(class, "name")).is_ok());
        assert!(assert_instance_member(&Site::parameter(class, "run", 0)).is_ok());
        assert!(assert_instance_member(&Site::constructor_parameter(class, 0)).is_ok());
    }

    #[test]
    fn test_static_property_rejected() {
        let err = assert_instance_member(&Site::static_property(ClassId(0), "staticProperty"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Decorator can´t be declared on static method/property: staticProperty"
        );
    }

    #[test]
    fn test_static_method_parameter_names_method() {
        let err = assert_instance_member(&Site::static_parameter(ClassId(0), "staticMethod", 1))
            .unwrap_err();

        assert_eq!(
            err,
            MetadataError::StaticMember {
                slot: "staticMethod".to_string()
            }
        );
    }
}
