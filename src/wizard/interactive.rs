use anyhow::{Result, bail};

use super::request::validate_machine_name;
use super::{PlacementRule, Wizard, WizardError};
use crate::backend::CloudManager;
use crate::cloud::{Job, MachineConfiguration, Network, ProviderAccount, ResourceId};
use crate::compat::{CompatibleResources, Selection};
use crate::helpers::user_data::{read_user_data, user_data_digest};
use crate::helpers::{choose_index, choose_one, choose_optional, prompt_line, spinner};
use crate::settings::Settings;

/// How a step that depends on the offered resources ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Done,
    /// Nothing to pick from; the operator has to choose another
    /// account or location.
    Reselect,
}

fn account_label(account: &ProviderAccount) -> String {
    format!("{} | {}", account.provider().description(), account.id())
}

fn config_label(config: &MachineConfiguration) -> String {
    format!(
        "{} | {} vCPU | {} MiB | {} GiB",
        config.name(),
        config.cpu(),
        config.memory(),
        config.disk()
    )
}

fn network_label(network: &Network) -> String {
    format!("{} | {}", network.name(), network.location())
}

fn print_notices(wizard: &mut Wizard<'_>) {
    for notice in wizard.take_notices() {
        println!("! {notice}");
    }
}

/// Steps 1-2: provider account then location, refreshing the offered
/// resources once both are known.
async fn pick_placement(wizard: &mut Wizard<'_>) -> Result<()> {
    // 1) Provider account
    let labels: Vec<String> = wizard.accounts().iter().map(account_label).collect();
    let idx = choose_index("Select Provider Account", labels)?;
    let account = wizard.accounts()[idx].id().clone();

    // 2) Location among the provider's locations
    let location = choose_one("Select Location", wizard.locations(&account)?)?;

    let pb = spinner("Fetching images, configurations and networks");
    wizard.select(Selection::new(account, Some(location))).await?;
    pb.finish_and_clear();

    print_notices(wizard);
    Ok(())
}

/// Step 3: name and description.
fn pick_metadata(wizard: &mut Wizard<'_>) -> Result<()> {
    let name = loop {
        let name = prompt_line("Machine name")?;
        match validate_machine_name(&name) {
            Ok(()) => break name.trim().to_string(),
            Err(err) => println!("{err}"),
        }
    };
    let description = prompt_line("Description (optional)")?;

    wizard.builder_mut().set_name(name).set_description(description);
    Ok(())
}

/// Steps 4-5: image and hardware configuration, both mandatory. When
/// either list is empty no picker is shown and the caller is asked to
/// go back to the account/location step.
fn pick_image_and_config(wizard: &mut Wizard<'_>, offered: &CompatibleResources) -> Result<StepOutcome> {
    if offered.images().is_empty() {
        println!("No image is available for this account and location. Pick another one.");
        return Ok(StepOutcome::Reselect);
    }
    if offered.configurations().is_empty() {
        println!("No hardware configuration is available for this account and location. Pick another one.");
        return Ok(StepOutcome::Reselect);
    }

    let idx = choose_index("Select Image", offered.images().iter().map(|i| i.name()).collect())?;
    let image = offered.images()[idx].id().clone();

    let idx = choose_index(
        "Select Hardware Configuration",
        offered.configurations().iter().map(config_label).collect(),
    )?;
    let config = offered.configurations()[idx].id().clone();

    wizard.builder_mut().set_image(Some(image)).set_config(Some(config));
    Ok(StepOutcome::Done)
}

fn pick_position(title: &str, len: usize) -> Result<usize> {
    let positions: Vec<String> = (0..=len).map(|p| format!("position {}", p + 1)).collect();
    choose_index(title, positions)
}

/// Step 6: ordered network interfaces. The first one is the primary.
fn pick_network_interfaces(wizard: &mut Wizard<'_>, offered: &CompatibleResources) -> Result<()> {
    const ADD: &str = "Add interface";
    const MOVE: &str = "Move interface";
    const REMOVE: &str = "Remove interface";
    const DONE: &str = "Done";

    loop {
        let nics = wizard.builder().nics();
        println!("\nNetwork interfaces:");
        if nics.is_empty() {
            println!("  (none)");
        }
        for (idx, network) in nics.networks().iter().enumerate() {
            println!("  {}. {}", idx + 1, network_label(network));
        }

        let available: Vec<&Network> = offered.networks().iter().filter(|n| !nics.contains(n.id())).collect();
        let mut actions = Vec::new();
        if !available.is_empty() {
            actions.push(ADD);
        }
        if nics.len() > 1 {
            actions.push(MOVE);
        }
        if !nics.is_empty() {
            actions.push(REMOVE);
        }
        actions.push(DONE);

        match choose_one("Network Interfaces", actions)? {
            ADD => {
                let idx = choose_index("Select Network", available.iter().map(|n| network_label(n)).collect())?;
                let network = available[idx].clone();
                let position = pick_position("Insert at", nics.len())?;
                wizard.builder_mut().nics_mut().insert(position, network);
            }
            MOVE => {
                let from = choose_index("Interface to move", nics.networks().iter().map(network_label).collect())?;
                let to = pick_position("Move to", nics.len() - 1)?;
                wizard.builder_mut().nics_mut().move_to(from, to);
            }
            REMOVE => {
                let idx = choose_index("Interface to remove", nics.networks().iter().map(network_label).collect())?;
                wizard.builder_mut().nics_mut().remove(idx);
            }
            _ => return Ok(()),
        }
    }
}

/// Steps 7-8: optional key pair and user data.
fn pick_access(wizard: &mut Wizard<'_>) -> Result<()> {
    let names: Vec<&str> = wizard.credentials().iter().map(|c| c.name()).collect();
    let credential = if names.is_empty() {
        None
    } else {
        choose_optional("Select Key Pair", names)?.map(|idx| wizard.credentials()[idx].id().clone())
    };

    let user_data = loop {
        let path = prompt_line("User data file (optional)")?;
        let path = path.trim();
        if path.is_empty() {
            break String::new();
        }
        match read_user_data(path) {
            Ok(user_data) => break user_data,
            Err(err) => println!("{err:#}"),
        }
    };

    wizard.builder_mut().set_credential(credential).set_user_data(user_data);
    Ok(())
}

/// Step 9: placement rule and the machines it binds to.
fn pick_host_placement(wizard: &mut Wizard<'_>, offered: &CompatibleResources) -> Result<()> {
    let rule = if offered.host_machines().is_empty() {
        PlacementRule::None
    } else {
        choose_one("Placement rule", PlacementRule::ALL.to_vec())?
    };

    let mut members: Vec<ResourceId> = Vec::new();
    if rule != PlacementRule::None {
        const DONE: &str = "(done)";
        loop {
            let candidates: Vec<_> = offered
                .host_machines()
                .iter()
                .filter(|m| !members.contains(m.id()))
                .collect();
            if candidates.is_empty() {
                break;
            }

            let mut labels: Vec<String> = candidates.iter().map(|m| m.name().to_string()).collect();
            if !members.is_empty() {
                labels.insert(0, DONE.to_string());
            }
            let idx = choose_index("Add placement rule member", labels)?;
            let idx = if members.is_empty() {
                idx
            } else if idx == 0 {
                break;
            } else {
                idx - 1
            };
            members.push(candidates[idx].id().clone());
        }
    }

    wizard.builder_mut().set_placement(rule, members);
    Ok(())
}

fn or_none(found: Option<&str>) -> &str {
    found.unwrap_or("<none>")
}

fn print_summary(wizard: &Wizard<'_>, offered: &CompatibleResources) {
    let builder = wizard.builder();
    let selection = offered.selection();

    println!("\n=== Machine ===");
    println!("Account:  {}", selection.account());
    if let Some(location) = selection.location() {
        println!("Location: {location}");
    }
    println!("Name:     {}", builder.name());
    println!(
        "Image:    {}",
        or_none(builder.image().and_then(|id| offered.image(id)).map(|i| i.name()))
    );
    println!(
        "Hardware: {}",
        or_none(builder.config().and_then(|id| offered.configuration(id)).map(|c| c.name()))
    );
    for (idx, network) in builder.nics().networks().iter().enumerate() {
        println!("NIC {}:    {}", idx + 1, network.name());
    }
    println!(
        "Key pair: {}",
        or_none(
            builder
                .credential()
                .and_then(|id| wizard.credentials().iter().find(|c| c.id() == id))
                .map(|c| c.name())
        )
    );
    if builder.user_data().trim().is_empty() {
        println!("User data: <none>");
    } else {
        println!(
            "User data: {} bytes, sha256 {}",
            builder.user_data().len(),
            user_data_digest(builder.user_data())
        );
    }
    println!("Placement: {}", builder.placement_rule());
}

/// Drive the whole wizard in the terminal and submit the request.
pub async fn run(backend: &dyn CloudManager, settings: &Settings) -> Result<Job> {
    let mut wizard = Wizard::init(backend, settings).await?;
    print_notices(&mut wizard);

    pick_placement(&mut wizard).await?;
    pick_metadata(&mut wizard)?;

    loop {
        let Some(offered) = wizard.offered() else {
            bail!(WizardError::InvalidRequest("no provider account selected".to_string()));
        };

        if pick_image_and_config(&mut wizard, &offered)? == StepOutcome::Reselect {
            pick_placement(&mut wizard).await?;
            continue;
        }
        pick_network_interfaces(&mut wizard, &offered)?;
        pick_access(&mut wizard)?;
        if settings.host_placement() {
            pick_host_placement(&mut wizard, &offered)?;
        }

        print_summary(&wizard, &offered);

        let actions = vec!["Create machine", "Change provider account / location", "Cancel"];
        match choose_index("Confirm", actions)? {
            0 => break,
            1 => pick_placement(&mut wizard).await?,
            _ => bail!(WizardError::Cancelled),
        }
    }

    let request = wizard.build_request()?;

    let pb = spinner("Submitting machine creation request");
    let job = wizard.submit(&request).await;
    pb.finish_and_clear();

    Ok(job?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CatalogBackend;
    use crate::compat::Category;
    use crate::testing::{sample_catalog, sample_settings};

    #[tokio::test]
    async fn test_unavailable_images_send_operator_back_to_placement() {
        let mut catalog = sample_catalog();
        catalog.mark_unavailable(Category::Images);
        let backend = CatalogBackend::new(catalog);
        let settings = sample_settings();
        let mut wizard = Wizard::init(&backend, &settings).await.unwrap();

        let offered = wizard
            .select(Selection::new("acc-ovh", Some("France".into())))
            .await
            .unwrap();
        let outcome = pick_image_and_config(&mut wizard, &offered).unwrap();

        assert_eq!(outcome, StepOutcome::Reselect);
        assert!(wizard.builder().image().is_none());
        assert!(wizard.builder().config().is_none());
    }

    #[tokio::test]
    async fn test_unmapped_location_sends_operator_back_to_placement() {
        let backend = CatalogBackend::new(sample_catalog());
        let settings = sample_settings();
        let mut wizard = Wizard::init(&backend, &settings).await.unwrap();

        let offered = wizard
            .select(Selection::new("acc-aws", Some("Ireland".into())))
            .await
            .unwrap();
        assert!(wizard.take_notices().is_empty());

        let outcome = pick_image_and_config(&mut wizard, &offered).unwrap();

        assert_eq!(outcome, StepOutcome::Reselect);
        assert!(wizard.builder().image().is_none());
    }

    #[tokio::test]
    async fn test_missing_configurations_send_operator_back_to_placement() {
        let mut catalog = sample_catalog();
        catalog.mark_unavailable(Category::MachineConfigurations);
        let backend = CatalogBackend::new(catalog);
        let settings = sample_settings();
        let mut wizard = Wizard::init(&backend, &settings).await.unwrap();

        let offered = wizard
            .select(Selection::new("acc-ovh", Some("France".into())))
            .await
            .unwrap();
        assert!(!offered.images().is_empty());

        let outcome = pick_image_and_config(&mut wizard, &offered).unwrap();

        assert_eq!(outcome, StepOutcome::Reselect);
        assert!(wizard.builder().config().is_none());
    }

    #[tokio::test]
    async fn test_print_notices_drains_them() {
        let mut catalog = sample_catalog();
        catalog.mark_unavailable(Category::Networks);
        let backend = CatalogBackend::new(catalog);
        let settings = sample_settings();
        let mut wizard = Wizard::init(&backend, &settings).await.unwrap();
        wizard
            .select(Selection::new("acc-ovh", Some("France".into())))
            .await
            .unwrap();

        print_notices(&mut wizard);

        assert!(wizard.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_no_host_machines_means_no_placement_rule() {
        let mut catalog = sample_catalog();
        catalog.mark_unavailable(Category::HostMachines);
        let backend = CatalogBackend::new(catalog);
        let settings = sample_settings();
        let mut wizard = Wizard::init(&backend, &settings).await.unwrap();

        let offered = wizard
            .select(Selection::new("acc-ovh", Some("France".into())))
            .await
            .unwrap();
        wizard
            .builder_mut()
            .set_placement(PlacementRule::Affinity, vec!["m-web-1".into()]);

        pick_host_placement(&mut wizard, &offered).unwrap();

        assert_eq!(wizard.builder().placement_rule(), PlacementRule::None);
    }

    #[test]
    fn test_config_label_shows_capacity() {
        let config = MachineConfiguration::new("cfg-small", "small", 1, 1024, 10, Vec::new());

        assert_eq!(config_label(&config), "small | 1 vCPU | 1024 MiB | 10 GiB");
    }
}
