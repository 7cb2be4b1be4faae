//! Test fixtures - reusable model documents.

/// One region, one host, one component
pub const SINGLE_HOST: &str = r#"model:
  id: t1
regions:
  r1:
    hosts:
      h1:
        instanceType: small
        components:
          - type: generic
            id: c1
"#;

/// `SINGLE_HOST` with a bigger instance type on `h1`
pub const SINGLE_HOST_RESIZED: &str = r#"model:
  id: t1
regions:
  r1:
    hosts:
      h1:
        instanceType: large
        components:
          - type: generic
            id: c1
"#;

/// Same instance, nothing declared
pub const EMPTY_MODEL: &str = r#"model:
  id: t1
regions: {}
"#;

/// Two regions with routers and a controller
pub const MULTI_REGION: &str = r#"model:
  id: edge
regions:
  us-east:
    site: us-east-1a
    hosts:
      ctrl:
        instanceType: t3.medium
        components:
          - type: ziti-controller
            id: ctrl
            version: "1.1.0"
      edge-east:
        instanceType: t3.micro
        components:
          - type: ziti-router
            id: router
            mode: edge
  eu-west:
    hosts:
      edge-west:
        instanceType: t3.micro
        components:
          - type: ziti-router
            id: router
            mode: fabric
          - type: generic
            id: metrics
"#;

/// Errors: missing model id, unknown component type, bad router mode
pub const INVALID_MODEL: &str = r#"model: {}
regions:
  r1:
    hosts:
      h1:
        components:
          - type: no-such-type
            id: c1
          - type: ziti-router
            id: c2
            mode: sideways
"#;
