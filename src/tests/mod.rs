mod connector_tests;
mod ignore_invalid;
mod registry_tests;
