//! Domain Value Objects

mod component_type;

pub use component_type::{
    ComponentBehavior, ComponentContext, ComponentType, ControllerComponent, GenericComponent,
    RouterComponent, RouterMode, Startable, CONTROLLER_LABEL, GENERIC_LABEL, ROUTER_LABEL,
};
