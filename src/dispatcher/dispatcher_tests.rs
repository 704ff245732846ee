/*
 * Unit tests for dispatcher module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 * Elevators run on real threads with zero travel and dwell time.
 *
 * Tests:
 *  - test_dispatcher_init
 *  - test_dispatcher_rejects_invalid_building
 *  - test_submit_request_rejects_out_of_range_floors
 *  - test_submit_request_same_floor_is_noop
 *  - test_submit_request_converts_to_internal_floors
 *  - test_submit_request_keeps_one_pending_wake
 *  - test_single_elevator_trip
 *  - test_two_elevators_drain_each_request_once
 *  - test_snapshot_lists_floors_top_down
 *  - test_run_stops_on_sentinel
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod dispatcher_tests {
    use crate::config::{Config, StatusFormat};
    use crate::dispatcher::{Dispatcher, RequestPort};
    use crate::request_board::RequestBoard;
    use crate::shared::Direction::Idle;
    use crate::shared::{BuildingSnapshot, DispatchError, HallCall};
    use std::collections::BTreeSet;
    use crossbeam_channel::bounded;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread::{sleep, spawn};
    use std::time::{Duration, Instant};

    fn test_config(n_floors: u8, n_elevators: usize) -> Config {
        let mut config = Config::default();
        config.building.n_floors = n_floors;
        config.building.n_elevators = n_elevators;
        config.elevator.floor_travel_time = 0;
        config.elevator.dwell_time = 0;
        config.generator.enabled = false;
        config.status.interval = 5;
        config
    }

    // Polls snapshots until `done` holds, panicking after a few seconds.
    fn wait_for(
        dispatcher: &mut Dispatcher,
        done: impl Fn(&BuildingSnapshot) -> bool,
    ) -> BuildingSnapshot {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let snapshot = dispatcher.snapshot();
            if done(&snapshot) {
                return snapshot;
            }
            if Instant::now() > deadline {
                panic!("Timed out, last snapshot: {:?}", snapshot);
            }
            sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_dispatcher_init() {
        // Arrange
        let dispatcher = Dispatcher::new(test_config(10, 3)).unwrap();

        // Assert
        assert_eq!(dispatcher.n_floors(), 10);
        assert_eq!(dispatcher.n_elevators(), 3);
        assert!(dispatcher.elevator_states().iter().all(|state| state.is_idle()));
        assert!(dispatcher.elevator_states().iter().all(|state| state.floor == 0));
        assert!(!dispatcher.stop_flag().is_stopped());
    }

    #[test]
    fn test_dispatcher_rejects_invalid_building() {
        let one_floor = Dispatcher::new(test_config(1, 1));
        let no_elevators = Dispatcher::new(test_config(5, 0));
        let mut high_start = test_config(5, 1);
        high_start.elevator.start_floor = 5;

        assert!(matches!(one_floor, Err(DispatchError::InvalidBuilding(_))));
        assert!(matches!(no_elevators, Err(DispatchError::InvalidBuilding(_))));
        assert!(matches!(
            Dispatcher::new(high_start),
            Err(DispatchError::InvalidBuilding(_))
        ));
    }

    #[test]
    fn test_submit_request_rejects_out_of_range_floors() {
        // Arrange
        let dispatcher = Dispatcher::new(test_config(10, 1)).unwrap();

        // Act
        let below = dispatcher.submit_request(0, 5);
        let above = dispatcher.submit_request(3, 11);

        // Assert
        assert!(matches!(
            below,
            Err(DispatchError::InvalidFloor { floor: 0, n_floors: 10 })
        ));
        assert!(matches!(
            above,
            Err(DispatchError::InvalidFloor { floor: 11, n_floors: 10 })
        ));
        assert!(dispatcher.port().board().is_empty());
    }

    #[test]
    fn test_submit_request_same_floor_is_noop() {
        // Arrange
        let mut dispatcher = Dispatcher::new(test_config(10, 1)).unwrap();
        dispatcher.submit_request(2, 9).unwrap();
        let before = dispatcher.snapshot();

        // Act
        let result = dispatcher.submit_request(4, 4);

        // Assert
        assert_eq!(result.unwrap(), None);
        assert_eq!(dispatcher.snapshot(), before);
    }

    #[test]
    fn test_submit_request_converts_to_internal_floors() {
        let mut dispatcher = Dispatcher::new(test_config(10, 1)).unwrap();

        assert_eq!(dispatcher.submit_request(3, 7).unwrap(), Some(HallCall::Up));
        assert_eq!(dispatcher.submit_request(10, 1).unwrap(), Some(HallCall::Down));

        let snapshot = dispatcher.snapshot();
        let floor = |n: u8| snapshot.floors.iter().find(|f| f.floor == n).unwrap().clone();
        assert_eq!(floor(2).up, BTreeSet::from([6]));
        assert_eq!(floor(9).down, BTreeSet::from([0]));
    }

    #[test]
    fn test_submit_request_keeps_one_pending_wake() {
        // Arrange
        let board = Arc::new(RequestBoard::new(10));
        let (busy_tx, busy_rx) = bounded::<()>(1);
        let (idle_tx, idle_rx) = bounded::<()>(1);
        let port = RequestPort::new(board.clone(), vec![busy_tx, idle_tx]);

        // Act
        port.submit_request(1, 5).unwrap();
        idle_rx.recv().unwrap();
        port.submit_request(2, 6).unwrap();
        port.submit_request(9, 3).unwrap();
        port.submit_request(4, 4).unwrap();

        // Assert
        assert_eq!(busy_rx.len(), 1);
        assert_eq!(idle_rx.len(), 1);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_single_elevator_trip() {
        // Purpose: 10 floors, 1 idle elevator at floor 1; submit(3, 7)

        // Arrange
        let mut dispatcher = Dispatcher::new(test_config(10, 1)).unwrap();
        dispatcher.start().unwrap();

        // Act
        dispatcher.submit_request(3, 7).unwrap();

        // Assert
        let snapshot = wait_for(&mut dispatcher, |snapshot| {
            let elevator = &snapshot.elevators[0];
            snapshot.pending_requests() == 0 && elevator.floor == 6 && elevator.is_idle()
        });
        assert_eq!(snapshot.elevators[0].direction, Idle);
        assert_eq!(snapshot.elevators[0].boarded, 1);

        // Cleanup
        dispatcher.shutdown();
        assert!(dispatcher.stop_flag().is_stopped());
    }

    #[test]
    fn test_two_elevators_drain_each_request_once() {
        // Purpose: 10 floors, 2 idle elevators at floor 1; submit(8, 2) then submit(9, 1)

        // Arrange
        let mut dispatcher = Dispatcher::new(test_config(10, 2)).unwrap();
        dispatcher.start().unwrap();

        // Act
        dispatcher.submit_request(8, 2).unwrap();
        dispatcher.submit_request(9, 1).unwrap();

        // Assert
        let snapshot = wait_for(&mut dispatcher, |snapshot| {
            snapshot.pending_requests() == 0
                && snapshot.elevators.iter().all(|elevator| elevator.is_idle())
                && snapshot.elevators.iter().map(|e| e.boarded).sum::<u64>() == 2
        });
        let board = dispatcher.port();
        assert!(!board.board().has_down_request(7));
        assert!(!board.board().has_down_request(8));
        assert_eq!(snapshot.elevators.iter().map(|e| e.boarded).sum::<u64>(), 2);

        // Cleanup
        dispatcher.shutdown();
    }

    #[test]
    fn test_snapshot_lists_floors_top_down() {
        let mut dispatcher = Dispatcher::new(test_config(4, 2)).unwrap();

        let snapshot = dispatcher.snapshot();

        let floors: Vec<u8> = snapshot.floors.iter().map(|floor| floor.floor).collect();
        assert_eq!(floors, vec![3, 2, 1, 0]);
        assert_eq!(snapshot.floors[3].elevators, vec![0, 1]);
        assert_eq!(snapshot.elevators.len(), 2);
    }

    #[test]
    fn test_run_stops_on_sentinel() {
        // Arrange
        let mut config = test_config(6, 2);
        config.generator.enabled = true;
        config.generator.interval = 1;
        config.generator.seed = Some(11);
        config.status.format = StatusFormat::Json;
        let dispatcher = Dispatcher::new(config).unwrap();
        let stop = dispatcher.stop_flag();

        // Act
        let run_thread = spawn(move || dispatcher.run(Cursor::new("hello\n0\n"), Vec::new()));

        // Assert
        let result = run_thread.join().unwrap();
        assert!(result.is_ok());
        assert!(stop.is_stopped());
    }
}
