//! Fixtures shared by the unit tests.

use crate::backend::Catalog;
use crate::cloud::{
    CloudProvider, Credentials, Location, Machine, MachineConfiguration, MachineImage, Network, ProviderAccount,
    ProviderMapping,
};
use crate::settings::{BackendSettings, Settings};

fn paris() -> Location {
    Location::new("FR", "France").with_region("Ile-de-France").with_city("Paris")
}

fn roubaix() -> Location {
    Location::new("FR", "France").with_region("Hauts-de-France").with_city("Roubaix")
}

fn frankfurt() -> Location {
    Location::new("DE", "Germany").with_region("Hesse").with_city("Frankfurt")
}

fn mapped(pairs: &[(&str, &str)]) -> Vec<ProviderMapping> {
    pairs.iter().map(|(acc, loc)| ProviderMapping::new(*acc, *loc)).collect()
}

/// Tenant `tenant-a` with an OVH account (France, Germany) and an AWS
/// account (Germany).
pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::default();

    catalog
        .add_account(
            "tenant-a",
            ProviderAccount::new("acc-ovh", CloudProvider::new("ovh", "OVH", vec![paris(), roubaix(), frankfurt()])),
        )
        .add_account(
            "tenant-a",
            ProviderAccount::new("acc-aws", CloudProvider::new("aws", "Amazon EC2", vec![frankfurt()])),
        );

    catalog
        .add_image(MachineImage::new(
            "img-ubuntu",
            "ubuntu-24.04",
            mapped(&[("acc-ovh", "France"), ("acc-aws", "Germany")]),
        ))
        .add_image(MachineImage::new("img-windows", "windows-2022", mapped(&[("acc-aws", "Germany")])))
        .add_image(MachineImage::new("img-debian", "debian-12", mapped(&[("acc-ovh", "France")])));

    catalog
        .add_configuration(MachineConfiguration::new("cfg-large", "large", 4, 8192, 80, mapped(&[("acc-ovh", "France")])))
        .add_configuration(MachineConfiguration::new("cfg-small", "small", 1, 1024, 10, mapped(&[("acc-ovh", "France")])))
        .add_configuration(MachineConfiguration::new("cfg-medium", "medium", 2, 4096, 40, mapped(&[("acc-ovh", "France")])))
        .add_configuration(MachineConfiguration::new(
            "cfg-xlarge",
            "xlarge",
            8,
            16384,
            160,
            mapped(&[("acc-aws", "Germany")]),
        ));

    catalog
        .add_network(Network::new("net-public", "public", "acc-ovh", paris()))
        .add_network(Network::new("net-private-de", "private-de", "acc-ovh", frankfurt()))
        .add_network(Network::new("net-private-fr", "private-fr", "acc-ovh", roubaix()))
        .add_network(Network::new("net-aws-vpc", "vpc", "acc-aws", frankfurt()));

    catalog
        .add_machine(Machine::new("m-web-1", "web-1", "acc-ovh", paris()).with_state("STARTED"))
        .add_machine(Machine::new("m-db-1", "db-1", "acc-ovh", frankfurt()).with_state("STARTED"))
        .add_machine(Machine::new("m-app-1", "app-1", "acc-aws", frankfurt()).with_state("STOPPED"));

    catalog
        .add_credentials(Credentials::new("key-laptop", "laptop"))
        .add_credentials(Credentials::new("key-ci", "ci"));

    catalog
}

pub fn sample_settings() -> Settings {
    Settings {
        tenant_id: "tenant-a".to_string(),
        host_placement: true,
        backend: BackendSettings::Catalog {
            path: "catalog.json".into(),
        },
    }
}
