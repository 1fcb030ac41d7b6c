pub mod test_utils;
use assert_float_eq::*;
use std::sync::Arc;
use test_utils::{calibrate, click, ready_controller, MemoryStore};
use travelmap_core::calibration::CalibrationStage;
use travelmap_core::config::ViewerConfig;
use travelmap_core::coordinates::Coordinate;
use travelmap_core::input::{InputEvent, Modifiers, PointerButton};
use travelmap_core::journey_manager::TravelPace;
use travelmap_core::session::SessionStore;
use travelmap_core::session_controller::{ImageResource, ImageState, SessionController};

#[test]
fn calibrate_then_measure() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = ready_controller(store.clone());

    calibrate(&mut controller, (0.0, 0.0), (10.0, 0.0), "100");
    let view = controller.view();
    assert_eq!(view.calibration_stage, CalibrationStage::Complete);
    assert_float_absolute_eq!(view.map_scale, 10.0, 1e-12);

    assert!(click(&mut controller, 0.0, 0.0));
    assert!(click(&mut controller, 10.0, 0.0));
    assert!(click(&mut controller, 10.0, 10.0));

    let journey = controller.journeys().current_journey().unwrap();
    assert_float_absolute_eq!(journey.total_distance(), 20.0, 1e-9);

    let view = controller.view();
    assert_eq!(view.journeys.len(), 1);
    assert_eq!(view.journeys[0].distance, 200.0);
    // 200 miles at 24 miles per day
    assert_eq!(view.journeys[0].travel_days, 8.3);
    assert_eq!(view.total_distance, 200.0);
    assert!(view.can_undo);

    let snapshot = store.last_snapshot().unwrap();
    assert_eq!(snapshot.journeys.len(), 1);
    assert_eq!(snapshot.journeys[0].path.len(), 3);
}

#[test]
fn measurement_waits_for_image() {
    let store = Arc::new(MemoryStore::default());
    let mut controller =
        SessionController::new(ViewerConfig::default(), store.clone(), 100.0, 100.0).unwrap();
    assert_eq!(controller.image(), &ImageState::Pending);

    assert!(!click(&mut controller, 5.0, 5.0));
    assert!(!controller.handle(InputEvent::AddJourney));
    assert_eq!(controller.calibration().stage(), CalibrationStage::Unset);
    assert!(controller.journeys().is_empty());

    // viewport events do not depend on the image
    assert!(controller.handle(InputEvent::ZoomIn));

    controller.on_image_loaded(None);
    assert_eq!(controller.image(), &ImageState::Missing);
    assert!(!click(&mut controller, 5.0, 5.0));
    assert!(controller.view().image_missing);

    controller.on_image_loaded(Some(ImageResource {
        url: "http://127.0.0.1/map.png".to_string(),
        content_type: "image/png".to_string(),
    }));
    assert!(click(&mut controller, 5.0, 5.0));
    assert_eq!(
        controller.view().image_url.as_deref(),
        Some("http://127.0.0.1/map.png")
    );
}

#[test]
fn every_mutation_is_persisted() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = ready_controller(store.clone());
    assert_eq!(store.save_count(), 0);

    click(&mut controller, 10.0, 10.0);
    assert_eq!(store.save_count(), 1);
    assert_eq!(
        store.last_snapshot().unwrap().calibration.point1,
        Some(Coordinate::new(10.0, 10.0))
    );

    controller.handle(InputEvent::ZoomIn);
    assert_eq!(store.save_count(), 2);
    assert_float_absolute_eq!(store.last_snapshot().unwrap().viewport.scale, 1.2, 1e-12);

    // nothing changed, nothing written
    controller.handle(InputEvent::MenuHover(true));
    controller.handle(InputEvent::Wheel { delta_y: 100.0 });
    controller.handle(InputEvent::DeleteJourney(3));
    assert_eq!(store.save_count(), 2);
}

#[test]
fn ctrl_click_is_a_pan_not_a_point() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = ready_controller(store);

    assert!(!controller.handle(InputEvent::Click {
        x: 5.0,
        y: 5.0,
        modifiers: Modifiers::ctrl(),
    }));
    assert_eq!(controller.calibration().stage(), CalibrationStage::Unset);

    controller.handle(InputEvent::PointerDown {
        x: 5.0,
        y: 5.0,
        button: PointerButton::Primary,
        modifiers: Modifiers::ctrl(),
    });
    assert!(controller.view().is_dragging);
    assert!(controller.handle(InputEvent::PointerMove { x: 25.0, y: 15.0 }));
    controller.handle(InputEvent::PointerUp);
    assert_eq!(controller.view().position, Coordinate::new(20.0, 10.0));

    // clicks now land in the panned image
    assert!(click(&mut controller, 25.0, 15.0));
    assert_eq!(controller.calibration().point1, Some(Coordinate::new(5.0, 5.0)));
}

#[test]
fn failed_calibration_keeps_state() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = ready_controller(store.clone());
    click(&mut controller, 3.0, 3.0);
    click(&mut controller, 3.0, 3.0);
    let saves = store.save_count();

    assert!(!controller.handle(InputEvent::SubmitCalibration));
    assert_eq!(controller.calibration().stage(), CalibrationStage::Point2Set);
    assert_eq!(store.save_count(), saves);

    assert!(controller.handle(InputEvent::ResetCalibration));
    assert_eq!(controller.calibration().stage(), CalibrationStage::Unset);
}

#[test]
fn journey_menu_events() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = ready_controller(store);
    calibrate(&mut controller, (0.0, 0.0), (0.0, 10.0), "50");

    click(&mut controller, 0.0, 0.0);
    click(&mut controller, 0.0, 20.0);
    assert!(controller.handle(InputEvent::SetPace(TravelPace::ShipNormal)));

    assert!(controller.handle(InputEvent::AddJourney));
    click(&mut controller, 0.0, 0.0);
    click(&mut controller, 30.0, 40.0);
    assert!(controller.handle(InputEvent::SetMilesPerDay(50.0)));
    assert!(!controller.handle(InputEvent::SetMilesPerDay(-1.0)));

    let view = controller.view();
    assert_eq!(view.journeys.len(), 2);
    assert_eq!(view.journeys[0].distance, 100.0);
    assert_eq!(view.journeys[0].miles_per_day, 60.0);
    assert_eq!(view.journeys[1].distance, 250.0);
    assert_eq!(view.journeys[1].travel_days, 5.0);
    assert!(view.journeys[1].selected);
    assert_eq!(view.total_distance, 350.0);

    assert!(controller.handle(InputEvent::UndoJourney));
    assert!(controller.handle(InputEvent::SelectJourney(0)));
    assert!(controller.handle(InputEvent::ResetJourney(0)));
    assert!(controller.handle(InputEvent::DeleteJourney(1)));
    let view = controller.view();
    assert_eq!(view.journeys.len(), 1);
    assert_eq!(view.total_distance, 0.0);
    assert!(!view.can_undo);
}

#[test]
fn overlay_follows_journeys() {
    let store = Arc::new(MemoryStore::default());
    let mut controller = ready_controller(store);
    calibrate(&mut controller, (0.0, 0.0), (10.0, 0.0), "10");
    assert!(controller
        .surface()
        .pixmap()
        .pixels()
        .iter()
        .all(|p| p.alpha() == 0));

    click(&mut controller, 10.0, 50.0);
    click(&mut controller, 90.0, 50.0);
    assert!(controller
        .surface()
        .pixmap()
        .pixels()
        .iter()
        .any(|p| p.alpha() > 0));

    controller.handle(InputEvent::UndoJourney);
    assert!(controller
        .surface()
        .pixmap()
        .pixels()
        .iter()
        .all(|p| p.alpha() == 0));

    assert!(controller.handle(InputEvent::Resize {
        width: 40.0,
        height: 30.0,
    }));
    assert_eq!(controller.overlay_size(), (40, 30));
    let png = controller.render_overlay_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 160);
}

#[test]
fn restore_from_storage() {
    let (_temp_dir, storage) = test_utils::temp_storage("session_controller-restore");
    let storage = Arc::new(storage);
    {
        let mut controller = SessionController::new(
            ViewerConfig::default(),
            storage.clone(),
            100.0,
            100.0,
        )
        .unwrap();
        controller.on_image_loaded(Some(ImageResource {
            url: "http://127.0.0.1/map.png".to_string(),
            content_type: "image/png".to_string(),
        }));
        calibrate(&mut controller, (0.0, 0.0), (10.0, 0.0), "100");
        click(&mut controller, 0.0, 0.0);
        click(&mut controller, 10.0, 0.0);
        click(&mut controller, 10.0, 10.0);
        controller.handle(InputEvent::AddJourney);
        controller.handle(InputEvent::ZoomOut);
    }

    let restored = storage.load().unwrap().unwrap();
    let mut controller = SessionController::from_restored(
        ViewerConfig::default(),
        storage.clone(),
        restored,
        100.0,
        100.0,
    )
    .unwrap();
    assert_eq!(controller.image(), &ImageState::Pending);
    let view = controller.view();
    assert_eq!(view.calibration_stage, CalibrationStage::Complete);
    assert_float_absolute_eq!(view.scale, 0.8, 1e-12);
    assert_eq!(view.journeys.len(), 2);
    assert_eq!(view.journeys[0].distance, 200.0);
    assert!(view.journeys[1].selected);
    assert!(controller
        .surface()
        .pixmap()
        .pixels()
        .iter()
        .any(|p| p.alpha() > 0));

    controller.on_image_loaded(Some(ImageResource {
        url: "http://127.0.0.1/map.png".to_string(),
        content_type: "image/png".to_string(),
    }));
    assert!(controller.handle(InputEvent::SelectJourney(0)));
    assert!(controller.handle(InputEvent::UndoJourney));
    assert_eq!(controller.view().journeys[0].distance, 100.0);
}
