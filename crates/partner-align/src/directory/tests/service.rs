use super::common::*;
use std::sync::Arc;

use crate::directory::alignment::{AlignmentConfig, ConfidencePolicy};
use crate::directory::domain::OrganizationId;
use crate::directory::recommendation::RecommendationRequest;
use crate::directory::registration::{OrganizationSubmission, RegistrationError};
use crate::directory::repository::{OrganizationRepository, RecordFilter, RepositoryError};
use crate::directory::search::SearchQuery;
use crate::directory::service::{DirectoryService, DirectoryServiceError};

fn request(org_id: &str, limit: Option<usize>, offset: Option<usize>) -> RecommendationRequest {
    RecommendationRequest {
        org_id: org_id.to_string(),
        limit,
        offset,
    }
}

#[test]
fn register_assigns_sequential_ids_and_persists() {
    let (service, repository) = build_service();

    let first = service.register(submission("Tata Cares")).expect("registers");
    let second = service.register(submission("Infra Gives")).expect("registers");

    assert_eq!(first.id.as_str(), "org-000001");
    assert_eq!(second.id.as_str(), "org-000002");
    assert_eq!(repository.len(), 6);
    assert_eq!(service.get(&first.id).expect("stored").name, "Tata Cares");
}

#[test]
fn register_skips_ids_already_in_use() {
    let (service, _) = build_service();
    let mut taken = submission("Existing");
    taken.id = Some("org-000001".to_string());
    service.register(taken).expect("registers with explicit id");

    let record = service.register(submission("Next")).expect("registers");
    assert_eq!(record.id.as_str(), "org-000002");
}

#[test]
fn register_rejects_duplicate_and_invalid_submissions() {
    let (service, repository) = build_service();

    let mut duplicate = submission("Pragati Again");
    duplicate.id = Some("ngo-pragati".to_string());
    assert!(matches!(
        service.register(duplicate),
        Err(DirectoryServiceError::Repository(RepositoryError::Conflict))
    ));

    let nameless = OrganizationSubmission {
        name: " ".to_string(),
        ..submission("")
    };
    assert!(matches!(
        service.register(nameless),
        Err(DirectoryServiceError::Registration(RegistrationError::MissingName))
    ));
    assert_eq!(repository.len(), 4);
}

#[test]
fn racing_registrations_for_one_id_store_a_single_record() {
    let repository = MemoryRepository::default();
    let service = DirectoryService::new(
        Arc::new(GatedRepository::new(repository.clone(), 2)),
        AlignmentConfig::default(),
    );

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["First", "Second"]
            .into_iter()
            .map(|name| {
                let service = &service;
                scope.spawn(move || {
                    let mut entry = submission(name);
                    entry.id = Some("ngo-1".to_string());
                    service.register(entry)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("registration thread"))
            .collect()
    });

    let registered: Vec<_> = outcomes.iter().filter_map(|outcome| outcome.as_ref().ok()).collect();
    assert_eq!(registered.len(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(DirectoryServiceError::Repository(RepositoryError::Conflict))
    )));
    assert_eq!(repository.len(), 1);

    let stored = repository
        .list(&RecordFilter::All)
        .expect("list")
        .remove(0);
    assert_eq!(stored.name, registered[0].name);
}

#[test]
fn update_rejects_a_body_id_for_another_record() {
    let (service, _) = build_service();
    let id = OrganizationId::from("fdn-vidya");

    let mut edit = submission("Vidya Foundation India");
    edit.id = Some("ngo-pragati".to_string());
    assert!(matches!(
        service.update(&id, edit),
        Err(DirectoryServiceError::Registration(RegistrationError::IdMismatch { .. }))
    ));
    assert_eq!(service.get(&id).expect("stored").name, "Vidya Foundation");

    let mut same = submission("Vidya Foundation India");
    same.id = Some(" fdn-vidya ".to_string());
    let updated = service.update(&id, same).expect("matching id accepted");
    assert_eq!(updated.name, "Vidya Foundation India");
}

#[test]
fn update_replaces_existing_records_in_place() {
    let (service, repository) = build_service();
    let id = OrganizationId::from("fdn-vidya");

    let updated = service
        .update(&id, submission("Vidya Foundation India"))
        .expect("update succeeds");
    assert_eq!(updated.id, id);
    assert_eq!(service.get(&id).expect("stored").name, "Vidya Foundation India");
    assert_eq!(repository.len(), 4);

    let missing = service.update(&OrganizationId::from("nope"), submission("Ghost"));
    assert!(matches!(
        missing,
        Err(DirectoryServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn recommend_ranks_partners_by_pairwise_score() {
    let (service, _) = build_service();
    let page = service
        .recommend(request("ngo-pragati", None, None))
        .expect("recommendations");

    let scored: Vec<(&str, u8, &str)> = page
        .results
        .iter()
        .map(|entry| {
            (
                entry.organization.id.as_str(),
                entry.alignment_score,
                entry.match_reason.as_str(),
            )
        })
        .collect();
    assert_eq!(
        scored,
        vec![
            ("fdn-vidya", 80, "1 focus area match, Same region, Both verified"),
            ("inc-launchpad", 60, "1 focus area match"),
            ("se-jal", 40, "Complementary missions"),
        ]
    );
    assert_eq!(page.total, 3);
}

#[test]
fn recommend_pages_through_results() {
    let (service, _) = build_service();
    let page = service
        .recommend(request("ngo-pragati", Some(1), Some(1)))
        .expect("recommendations");
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].organization.id.as_str(), "inc-launchpad");
    assert_eq!(page.total, 3);

    let capped = DirectoryService::new(
        Arc::new(MemoryRepository::seeded(directory())),
        AlignmentConfig::default(),
    )
    .with_max_page_size(2)
    .recommend(request("ngo-pragati", Some(100), None))
    .expect("recommendations");
    assert_eq!(capped.limit, 2);
    assert_eq!(capped.results.len(), 2);
}

#[test]
fn recommend_unknown_organization_is_not_found() {
    let (service, _) = build_service();
    assert!(matches!(
        service.recommend(request("missing", None, None)),
        Err(DirectoryServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn align_and_search_surface_repository_failures() {
    let service = DirectoryService::new(Arc::new(UnavailableRepository), AlignmentConfig::default());

    assert!(matches!(
        service.search(&SearchQuery::default()),
        Err(DirectoryServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.align(&OrganizationId::from("a"), &OrganizationId::from("b")),
        Err(DirectoryServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn seed_loads_records_and_search_sees_them() {
    let service = DirectoryService::new(
        Arc::new(MemoryRepository::default()),
        AlignmentConfig::default(),
    );
    assert_eq!(service.seed(directory()).expect("seeded"), 4);

    let results = service.search(&SearchQuery::default()).expect("search");
    assert_eq!(results.total, 4);

    let alignment = service
        .align(&OrganizationId::from("ngo-pragati"), &OrganizationId::from("fdn-vidya"))
        .expect("aligned");
    assert_eq!(alignment.score, 80);
}

#[test]
fn service_exposes_the_configured_alignment_policy() {
    let config = AlignmentConfig::uniform(ConfidencePolicy::flat_penalty());
    let service = DirectoryService::new(Arc::new(MemoryRepository::default()), config);

    assert_eq!(service.engine().config(), &config);
    assert_eq!(
        service.engine().config().contextual_confidence,
        ConfidencePolicy::flat_penalty()
    );
}
