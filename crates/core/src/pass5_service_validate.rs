//! Pass 5: Service validation -- every request and response type must name
//! a declared struct.

use crate::error::{CompileError, ErrorKind, Site};
use crate::ir::{ServiceTable, StructTable};

pub fn validate_services(
    services: ServiceTable,
    structs: &StructTable,
) -> Result<ServiceTable, CompileError> {
    for (service_name, svc) in services.iter() {
        for m in svc.methods() {
            let site = Site::new(5, "Service", service_name).with_field(m.name());
            for (role, typename) in [("request", m.request()), ("response", m.response())] {
                if !structs.contains(typename) {
                    return Err(site.error(
                        ErrorKind::UndefinedType,
                        Some(m.location()),
                        format!(
                            "error processing service {}, method {}: undefined {} struct type {}",
                            service_name,
                            m.name(),
                            role,
                            typename
                        ),
                    ));
                }
            }
        }
    }
    Ok(services)
}
